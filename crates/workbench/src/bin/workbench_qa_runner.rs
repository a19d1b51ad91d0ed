use std::env;
use std::str::FromStr;
use std::sync::Arc;

use snafu::{OptionExt, ResultExt, Snafu};

use skillbench_workbench::{
    ASSISTANT_ACK_TEXT, AuthSession, DEFAULT_SESSION_TITLE, DraftChange, FileBrowser, MessageId,
    Role, SelectionState, SessionId, SkillCatalog, Workbench, WorkbenchError, submit_login_form,
};

#[derive(Debug, Clone)]
struct RunnerArgs {
    scenario: Scenario,
}

#[derive(Debug, Clone, Copy)]
enum Scenario {
    IdRoundtrip,
    IdInvalid,
    CatalogBuiltin,
    SendPair,
    BlankSend,
    TitleOnce,
    PackToggle,
    SeoAuditWalkthrough,
    SessionIsolation,
    MockLogin,
    FileRoundtrip,
    All,
}

impl Scenario {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id_roundtrip" => Some(Self::IdRoundtrip),
            "id_invalid" => Some(Self::IdInvalid),
            "catalog_builtin" => Some(Self::CatalogBuiltin),
            "send_pair" => Some(Self::SendPair),
            "blank_send" => Some(Self::BlankSend),
            "title_once" => Some(Self::TitleOnce),
            "pack_toggle" => Some(Self::PackToggle),
            "seo_audit_walkthrough" => Some(Self::SeoAuditWalkthrough),
            "session_isolation" => Some(Self::SessionIsolation),
            "mock_login" => Some(Self::MockLogin),
            "file_roundtrip" => Some(Self::FileRoundtrip),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::IdRoundtrip => "id_roundtrip",
            Self::IdInvalid => "id_invalid",
            Self::CatalogBuiltin => "catalog_builtin",
            Self::SendPair => "send_pair",
            Self::BlankSend => "blank_send",
            Self::TitleOnce => "title_once",
            Self::PackToggle => "pack_toggle",
            Self::SeoAuditWalkthrough => "seo_audit_walkthrough",
            Self::SessionIsolation => "session_isolation",
            Self::MockLogin => "mock_login",
            Self::FileRoundtrip => "file_roundtrip",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Snafu)]
enum RunnerError {
    #[snafu(display("missing required --scenario argument"))]
    MissingScenario { stage: &'static str },
    #[snafu(display("missing value for argument '{arg}'"))]
    MissingArgumentValue {
        stage: &'static str,
        arg: &'static str,
    },
    #[snafu(display("unknown scenario '{raw}'"))]
    UnknownScenario { stage: &'static str, raw: String },
    #[snafu(display("unknown argument '{raw}'"))]
    UnknownArgument { stage: &'static str, raw: String },
    #[snafu(display("workbench validation failed: {source}"))]
    WorkbenchValidation {
        stage: &'static str,
        source: WorkbenchError,
    },
    #[snafu(display("scenario '{scenario}' failed: {reason}"))]
    ScenarioFailed {
        stage: &'static str,
        scenario: &'static str,
        reason: String,
    },
}

type RunnerResult<T> = Result<T, RunnerError>;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = run() {
        println!("runner_ok=false");
        eprintln!("runner_error={error}");
        std::process::exit(1);
    }
}

fn run() -> RunnerResult<()> {
    let args = parse_args(env::args().skip(1))?;
    println!("scenario={}", args.scenario.name());

    match args.scenario {
        Scenario::IdRoundtrip => run_id_roundtrip(),
        Scenario::IdInvalid => run_id_invalid(),
        Scenario::CatalogBuiltin => run_catalog_builtin(),
        Scenario::SendPair => run_send_pair(),
        Scenario::BlankSend => run_blank_send(),
        Scenario::TitleOnce => run_title_once(),
        Scenario::PackToggle => run_pack_toggle(),
        Scenario::SeoAuditWalkthrough => run_seo_audit_walkthrough(),
        Scenario::SessionIsolation => run_session_isolation(),
        Scenario::MockLogin => run_mock_login(),
        Scenario::FileRoundtrip => run_file_roundtrip(),
        Scenario::All => run_all(),
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> RunnerResult<RunnerArgs> {
    let mut scenario = None;
    let mut pending = args.into_iter();

    while let Some(argument) = pending.next() {
        match argument.as_str() {
            "--scenario" => {
                let value = pending.next().context(MissingArgumentValueSnafu {
                    stage: "parse-args-scenario-value",
                    arg: "--scenario",
                })?;

                let parsed = Scenario::parse(&value).context(UnknownScenarioSnafu {
                    stage: "parse-args-scenario",
                    raw: value,
                })?;
                scenario = Some(parsed);
            }
            _ => {
                return UnknownArgumentSnafu {
                    stage: "parse-args",
                    raw: argument,
                }
                .fail();
            }
        }
    }

    Ok(RunnerArgs {
        scenario: scenario.context(MissingScenarioSnafu {
            stage: "parse-args-scenario-required",
        })?,
    })
}

fn run_all() -> RunnerResult<()> {
    run_id_roundtrip()?;
    run_id_invalid()?;
    run_catalog_builtin()?;
    run_send_pair()?;
    run_blank_send()?;
    run_title_once()?;
    run_pack_toggle()?;
    run_seo_audit_walkthrough()?;
    run_session_isolation()?;
    run_mock_login()?;
    run_file_roundtrip()?;

    println!("all_passed=true");
    Ok(())
}

fn run_id_roundtrip() -> RunnerResult<()> {
    assert_id_roundtrip("session_id", SessionId::new_v7())?;
    assert_id_roundtrip("message_id", MessageId::new_v7())?;
    println!("runner_ok=true");
    Ok(())
}

fn run_id_invalid() -> RunnerResult<()> {
    let invalid_input = "not-a-valid-uuid";
    let invalid_id_error = invalid_input_is_rejected::<SessionId>(invalid_input)
        && invalid_input_is_rejected::<MessageId>(invalid_input);

    println!("invalid_id_error={invalid_id_error}");
    check(
        invalid_id_error,
        "id_invalid",
        "an id wrapper accepted malformed UUID input",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_catalog_builtin() -> RunnerResult<()> {
    let catalog = load_catalog()?;
    let pack_count = catalog.packs().len();
    let skill_count = catalog
        .packs()
        .iter()
        .map(|pack| pack.skills.len())
        .sum::<usize>();

    println!("pack_count={pack_count}");
    println!("skill_count={skill_count}");
    check(
        pack_count > 0 && skill_count > 0,
        "catalog_builtin",
        "embedded catalog is empty",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_send_pair() -> RunnerResult<()> {
    let mut workbench = new_workbench()?;
    workbench.set_draft("  plan the spring campaign ");
    workbench.send_draft();

    let messages = workbench.active_session().messages();
    let roles = messages.iter().map(|message| message.role).collect::<Vec<_>>();
    println!("message_count={}", messages.len());
    check(
        roles == [Role::User, Role::Assistant],
        "send_pair",
        "send did not append exactly user then assistant",
    )?;
    check(
        messages[0].content == "plan the spring campaign"
            && messages[1].content == ASSISTANT_ACK_TEXT,
        "send_pair",
        "message content was not trimmed or reply text changed",
    )?;
    check(
        workbench.draft().is_empty(),
        "send_pair",
        "draft survived a successful send",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_blank_send() -> RunnerResult<()> {
    let mut workbench = new_workbench()?;
    let rejected = ["", "   ", "\n\t"]
        .iter()
        .all(|text| workbench.send_message(text).is_none());

    println!("blank_rejected={rejected}");
    check(
        rejected && workbench.active_session().messages().is_empty(),
        "blank_send",
        "blank input mutated the transcript",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_title_once() -> RunnerResult<()> {
    let mut workbench = new_workbench()?;
    workbench.send_message("first topic");
    workbench.send_message("second topic");

    let title = workbench.active_session().title().to_string();
    println!("title={title}");
    check(
        title == "first topic",
        "title_once",
        format!("title was overwritten to '{title}'"),
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_pack_toggle() -> RunnerResult<()> {
    let mut workbench = new_workbench()?;

    for round in 0..2 {
        workbench.select_pack(0);
        workbench.select_pack(0);
        let session = workbench.active_session();
        check(
            SelectionState::of(session) == SelectionState::None && !session.skills_expanded(),
            "pack_toggle",
            format!("round {round} did not return to no selection"),
        )?;
    }

    println!("pack_toggle=true");
    println!("runner_ok=true");
    Ok(())
}

fn run_seo_audit_walkthrough() -> RunnerResult<()> {
    let mut workbench = new_workbench()?;
    check(
        workbench.active_session().title() == DEFAULT_SESSION_TITLE,
        "seo_audit_walkthrough",
        "fresh session has an unexpected title",
    )?;

    workbench.select_pack(0);
    check(
        SelectionState::of(workbench.active_session())
            == SelectionState::PackSelected {
                pack_index: 0,
                expanded: true,
            },
        "seo_audit_walkthrough",
        "pack click did not expand the skills list",
    )?;

    let change = workbench.select_skill("seo-audit");
    let expected_draft = workbench
        .catalog()
        .skill(0, "seo-audit")
        .map(|skill| skill.input_draft.clone())
        .context(ScenarioFailedSnafu {
            stage: "scenario-seo-audit-lookup",
            scenario: "seo_audit_walkthrough",
            reason: "seo-audit missing from the first pack".to_string(),
        })?;
    check(
        change == DraftChange::Replace(expected_draft.clone()) && workbench.draft() == expected_draft,
        "seo_audit_walkthrough",
        "skill click did not prefill the draft",
    )?;

    workbench.send_message("audit my site");
    let session = workbench.active_session();
    println!("message_count={}", session.messages().len());
    println!("title={}", session.title());
    check(
        session.messages().len() == 2 && session.title() == "audit my site",
        "seo_audit_walkthrough",
        "send after skill selection produced the wrong transcript",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_session_isolation() -> RunnerResult<()> {
    let mut workbench = new_workbench()?;
    let first_id = workbench.active_id();
    workbench.select_pack(0);
    workbench.select_skill("copywriting");
    workbench.send_message("write a headline");
    let first_snapshot = workbench.active_session().clone();

    workbench.create_session();
    workbench.select_pack(0);
    workbench.send_message("unrelated");
    workbench.select_session(first_id);

    println!("session_count={}", workbench.store().len());
    check(
        workbench.active_session() == &first_snapshot,
        "session_isolation",
        "switching sessions altered the first session",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_mock_login() -> RunnerResult<()> {
    let mut auth = AuthSession::new();
    let blank_rejected = submit_login_form(&mut auth, " ", "pw").is_err();
    let missing_password_rejected = submit_login_form(&mut auth, "dana", "").is_err();

    submit_login_form(&mut auth, " dana ", "pw").context(WorkbenchValidationSnafu {
        stage: "scenario-mock-login",
    })?;
    let logged_in = auth.username() == Some("dana");
    auth.logout();

    println!("logged_in={logged_in}");
    check(
        blank_rejected && missing_password_rejected && logged_in && !auth.is_logged_in(),
        "mock_login",
        "mock auth lifecycle misbehaved",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn run_file_roundtrip() -> RunnerResult<()> {
    let mut browser = FileBrowser::sample();
    browser
        .save("analytics-report.md", "# Updated")
        .context(WorkbenchValidationSnafu {
            stage: "scenario-file-save",
        })?;
    let opened = browser
        .open("analytics-report.md")
        .context(WorkbenchValidationSnafu {
            stage: "scenario-file-open",
        })?;
    let folder_rejected = browser.open("campaigns").is_err();

    println!("folder_rejected={folder_rejected}");
    check(
        opened.content == "# Updated" && folder_rejected,
        "file_roundtrip",
        "file browser did not serve saved content",
    )?;
    println!("runner_ok=true");
    Ok(())
}

fn load_catalog() -> RunnerResult<SkillCatalog> {
    SkillCatalog::builtin().context(WorkbenchValidationSnafu {
        stage: "load-builtin-catalog",
    })
}

fn new_workbench() -> RunnerResult<Workbench> {
    Ok(Workbench::new(Arc::new(load_catalog()?)))
}

fn check(condition: bool, scenario: &'static str, reason: impl Into<String>) -> RunnerResult<()> {
    if condition {
        return Ok(());
    }

    ScenarioFailedSnafu {
        stage: "scenario-check",
        scenario,
        reason: reason.into(),
    }
    .fail()
}

fn assert_id_roundtrip<T>(label: &'static str, id: T) -> RunnerResult<()>
where
    T: Copy + Eq + FromStr<Err = WorkbenchError> + std::fmt::Display,
{
    let encoded = id.to_string();
    let decoded = encoded.parse::<T>().context(WorkbenchValidationSnafu {
        stage: "scenario-id-roundtrip-parse",
    })?;

    check(
        decoded == id,
        "id_roundtrip",
        format!("{label} parse/format roundtrip mismatch"),
    )?;
    println!("{label}_roundtrip=true");
    Ok(())
}

fn invalid_input_is_rejected<T>(raw: &str) -> bool
where
    T: FromStr<Err = WorkbenchError>,
{
    matches!(raw.parse::<T>(), Err(WorkbenchError::InvalidId { .. }))
}
