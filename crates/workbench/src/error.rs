use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WorkbenchError {
    #[snafu(display("workbench id '{raw}' is invalid for {id_type}"))]
    InvalidId {
        stage: &'static str,
        id_type: &'static str,
        raw: String,
        source: uuid::Error,
    },
    #[snafu(display("failed to parse skill catalog on `{stage}`: {source}"))]
    CatalogParse {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("skill catalog is invalid: {details}"))]
    CatalogInvalid {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("please enter a username"))]
    MissingUsername { stage: &'static str },
    #[snafu(display("please enter a password"))]
    MissingPassword { stage: &'static str },
    #[snafu(display("login failed, please try again"))]
    LoginRejected { stage: &'static str },
    #[snafu(display("workspace entry '{name}' was not found"))]
    FileNotFound { stage: &'static str, name: String },
    #[snafu(display("workspace entry '{name}' is a folder"))]
    NotAFile { stage: &'static str, name: String },
}

pub type WorkbenchResult<T> = Result<T, WorkbenchError>;
