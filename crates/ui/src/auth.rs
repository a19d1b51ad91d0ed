use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    input::{Input, InputEvent, InputState},
    v_flex,
};
use skillbench_workbench::{AuthSession, WorkbenchError, submit_login_form};

/// Emitted after every login or logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChanged {
    pub username: Option<String>,
}

/// Shared sign-in state. Views receive this entity explicitly.
pub struct AuthState {
    session: AuthSession,
}

impl EventEmitter<AuthChanged> for AuthState {}

impl AuthState {
    pub fn new(cx: &mut App) -> Entity<Self> {
        cx.new(|_| Self {
            session: AuthSession::new(),
        })
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn submit(
        &mut self,
        username: &str,
        password: &str,
        cx: &mut Context<Self>,
    ) -> Result<(), WorkbenchError> {
        submit_login_form(&mut self.session, username, password)?;
        cx.emit(AuthChanged {
            username: self.session.username().map(str::to_string),
        });
        cx.notify();
        Ok(())
    }

    pub fn logout(&mut self, cx: &mut Context<Self>) {
        self.session.logout();
        cx.emit(AuthChanged { username: None });
        cx.notify();
    }
}

pub struct LoginView {
    auth: Entity<AuthState>,
    username_input: Entity<InputState>,
    password_input: Entity<InputState>,
    error_message: Option<SharedString>,
}

impl LoginView {
    pub fn new(auth: &Entity<AuthState>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let username_input = cx.new(|cx| InputState::new(window, cx).placeholder("Username"));
        let password_input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Password")
                .masked(true)
        });

        for input in [&username_input, &password_input] {
            cx.subscribe_in(input, window, |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.submit(window, cx);
                }
            })
            .detach();
        }

        Self {
            auth: auth.clone(),
            username_input,
            password_input,
            error_message: None,
        }
    }

    /// Clears the form, e.g. after logout brings the login screen back.
    pub fn reset(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        for input in [&self.username_input, &self.password_input] {
            input.update(cx, |state, cx| state.set_value("", window, cx));
        }
        self.error_message = None;
        cx.notify();
    }

    fn submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let username = self.username_input.read(cx).value().to_string();
        let password = self.password_input.read(cx).value().to_string();

        let result = self
            .auth
            .update(cx, |auth, cx| auth.submit(&username, &password, cx));

        self.error_message = match result {
            Ok(()) => {
                self.password_input
                    .update(cx, |state, cx| state.set_value("", window, cx));
                None
            }
            Err(error) => Some(login_error_text(&error).into()),
        };
        cx.notify();
    }
}

fn login_error_text(error: &WorkbenchError) -> &'static str {
    match error {
        WorkbenchError::MissingUsername { .. } => "Please enter a username.",
        WorkbenchError::MissingPassword { .. } => "Please enter a password.",
        _ => "Sign in failed. Please try again.",
    }
}

impl Render for LoginView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("login-screen")
            .size_full()
            .items_center()
            .justify_center()
            .bg(theme.background)
            .child(
                v_flex()
                    .id("login-form")
                    .w(px(360.))
                    .gap_3()
                    .p_6()
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.popover)
                    .shadow_lg()
                    .child(
                        div()
                            .text_lg()
                            .font_weight(FontWeight::SEMIBOLD)
                            .text_color(theme.foreground)
                            .child("Sign in to Skillbench"),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Any username works. Nothing leaves this machine."),
                    )
                    .child(Input::new(&self.username_input).w_full())
                    .child(Input::new(&self.password_input).w_full())
                    .when_some(self.error_message.clone(), |form, error| {
                        form.child(div().text_sm().text_color(theme.danger).child(error))
                    })
                    .child(
                        Button::new("login-submit")
                            .primary()
                            .small()
                            .w_full()
                            .child("Sign in")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.submit(window, cx);
                            })),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_inline_messages() {
        let mut session = AuthSession::new();

        let missing_username = submit_login_form(&mut session, " ", "pw").unwrap_err();
        assert_eq!(login_error_text(&missing_username), "Please enter a username.");

        let missing_password = submit_login_form(&mut session, "dana", "").unwrap_err();
        assert_eq!(login_error_text(&missing_password), "Please enter a password.");
    }
}
