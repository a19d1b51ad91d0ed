use std::path::PathBuf;
use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::notification::{Notification, NotificationList};
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use skillbench_workbench::SkillCatalog;

use crate::auth::{AuthChanged, AuthState, LoginView};
use crate::chat::{ChatSidebar, ChatView};
use crate::files::{FilesNotice, FilesPanel};
use crate::model_selector::{ModelSelected, ModelSelector, ModelSelectorSettingsClicked};
use crate::settings::{SettingsChanged, SettingsClose, SettingsState, SettingsView, apply_theme};

pub fn default_themes_path() -> PathBuf {
    PathBuf::from("./themes")
}

/// Default sidebar width when expanded.
pub const SIDEBAR_DEFAULT_WIDTH: f32 = 260.0;
/// Minimum allowed sidebar width.
pub const SIDEBAR_MIN_WIDTH: f32 = 200.0;
/// Maximum allowed sidebar width.
pub const SIDEBAR_MAX_WIDTH: f32 = 400.0;
pub const SIDEBAR_COLLAPSED_WIDTH: f32 = 56.0;
pub const FILES_PANEL_WIDTH: f32 = 360.0;
#[cfg(target_os = "macos")]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 78.0;
#[cfg(not(target_os = "macos"))]
const WINDOW_TOOLBAR_LEFT_SAFE_PADDING: f32 = 16.0;
#[cfg(target_os = "windows")]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 120.0;
#[cfg(not(target_os = "windows"))]
const WINDOW_TOOLBAR_RIGHT_SAFE_PADDING: f32 = 16.0;
const _: () = {
    assert!(SIDEBAR_COLLAPSED_WIDTH > 0.0);
    assert!(SIDEBAR_MIN_WIDTH < SIDEBAR_DEFAULT_WIDTH);
    assert!(SIDEBAR_DEFAULT_WIDTH < SIDEBAR_MAX_WIDTH);
};

/// Zed-style toolbar height that follows the rem size.
fn window_toolbar_height(window: &Window) -> Pixels {
    (1.75 * window.rem_size()).max(px(34.0))
}

/// Clamps a drag position to [`SIDEBAR_MIN_WIDTH`], [`SIDEBAR_MAX_WIDTH`].
pub fn compute_sidebar_width(drag_x: f32) -> f32 {
    drag_x.clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH)
}

gpui::actions!(shell, [NewSession, ToggleSidebar, ToggleFiles, Quit]);

#[derive(Clone)]
struct SidebarResizeDrag;

struct EmptyDragView;

impl Render for EmptyDragView {
    fn render(&mut self, _: &mut Window, _: &mut Context<Self>) -> impl IntoElement {
        div()
    }
}

/// Root view. Shows the login screen until [`AuthState`] reports a user,
/// then the sidebar, chat view and optional files panel.
pub struct ChatAppShell {
    focus_handle: FocusHandle,
    notification_list: Entity<NotificationList>,
    auth: Entity<AuthState>,
    login_view: Entity<LoginView>,
    settings_state: Entity<SettingsState>,
    settings_view: Entity<SettingsView>,
    chat_view: Entity<ChatView>,
    model_selector: Entity<ModelSelector>,
    files_panel: Entity<FilesPanel>,
    settings_open: bool,
    files_open: bool,
    sidebar_collapsed: bool,
    sidebar_width: f32,
    title_bar_should_move: bool,
}

impl ChatAppShell {
    pub fn new(
        catalog: Arc<SkillCatalog>,
        notification_list: Entity<NotificationList>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let auth = AuthState::new(cx);
        let login_view = cx.new(|cx| LoginView::new(&auth, window, cx));
        let settings_state = SettingsState::new(cx);
        let settings_view = cx.new(|cx| SettingsView::new(&settings_state, window, cx));
        let chat_view = cx.new(|cx| ChatView::new(catalog, window, cx));
        let model_id = settings_state.read(cx).settings().model_id.clone();
        let model_selector = cx.new(|_| ModelSelector::new(model_id));
        let files_panel = cx.new(|cx| FilesPanel::new(window, cx));

        cx.subscribe_in(&auth, window, |this, _, event: &AuthChanged, window, cx| {
            this.handle_auth_changed(event, window, cx);
        })
        .detach();

        cx.subscribe_in(
            &settings_state,
            window,
            |this, _, event: &SettingsChanged, window, cx| {
                apply_theme(&event.settings, Some(window), cx);
                this.model_selector.update(cx, |selector, cx| {
                    selector.set_model_id(event.settings.model_id.clone(), cx);
                });
                cx.refresh_windows();
            },
        )
        .detach();

        cx.subscribe(&settings_view, |this, _, _: &SettingsClose, cx| {
            this.settings_open = false;
            cx.notify();
        })
        .detach();

        cx.subscribe_in(
            &model_selector,
            window,
            |this, _, event: &ModelSelected, window, cx| {
                this.handle_model_selected(event, window, cx);
            },
        )
        .detach();

        cx.subscribe(
            &model_selector,
            |this, _, _: &ModelSelectorSettingsClicked, cx| {
                this.open_settings(cx);
            },
        )
        .detach();

        cx.subscribe_in(&files_panel, window, |this, _, event: &FilesNotice, window, cx| {
            this.notify_files(event, window, cx);
        })
        .detach();

        Self {
            focus_handle: cx.focus_handle(),
            notification_list,
            auth,
            login_view,
            settings_state,
            settings_view,
            chat_view,
            model_selector,
            files_panel,
            settings_open: false,
            files_open: false,
            sidebar_collapsed: false,
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
            title_bar_should_move: false,
        }
    }

    fn handle_auth_changed(
        &mut self,
        event: &AuthChanged,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        match &event.username {
            Some(username) => tracing::info!("signed in as {username}"),
            None => {
                tracing::info!("signed out");
                self.settings_open = false;
                self.login_view
                    .update(cx, |login, cx| login.reset(window, cx));
            }
        }
        cx.notify();
    }

    fn handle_model_selected(
        &mut self,
        event: &ModelSelected,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let result = self
            .settings_state
            .update(cx, |state, cx| state.set_model(&event.model_id, cx));

        if let Err(error) = result {
            tracing::error!("failed to persist model choice: {error}");
            self.push_notification(
                Notification::error(format!("Failed to save model choice: {error}")),
                window,
                cx,
            );
        }
    }

    fn notify_files(&mut self, notice: &FilesNotice, window: &mut Window, cx: &mut Context<Self>) {
        let notification = match notice {
            FilesNotice::Success(message) => Notification::success(message.clone()),
            FilesNotice::Error(message) => Notification::error(message.clone()),
        };
        self.push_notification(notification, window, cx);
    }

    fn push_notification(
        &self,
        notification: Notification,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.notification_list
            .update(cx, |list, cx| list.push(notification, window, cx));
    }

    fn toggle_sidebar(&mut self, cx: &mut Context<Self>) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        cx.notify();
    }

    fn toggle_files(&mut self, cx: &mut Context<Self>) {
        self.files_open = !self.files_open;
        cx.notify();
    }

    fn resize_sidebar(&mut self, new_width: f32, cx: &mut Context<Self>) {
        self.sidebar_width = compute_sidebar_width(new_width);
        cx.notify();
    }

    fn new_session(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !self.auth.read(cx).is_logged_in() {
            return;
        }
        self.chat_view
            .update(cx, |chat_view, cx| chat_view.create_session(window, cx));
    }

    fn open_settings(&mut self, cx: &mut Context<Self>) {
        if self.settings_open {
            return;
        }
        self.settings_open = true;
        cx.notify();
    }

    fn logout(&mut self, cx: &mut Context<Self>) {
        self.auth.update(cx, |auth, cx| auth.logout(cx));
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        if !self.auth.read(cx).is_logged_in() {
            return div()
                .size_full()
                .relative()
                .bg(theme.background)
                .child(self.login_view.clone())
                .child(self.notification_list.clone())
                .into_any_element();
        }

        let toolbar_height = window_toolbar_height(window);
        let collapsed = self.sidebar_collapsed;
        let sidebar = self.chat_view.read(cx).sidebar().clone();

        div()
            .id("app-shell")
            .key_context("Shell")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(|this, _: &NewSession, window, cx| {
                this.new_session(window, cx);
            }))
            .on_action(cx.listener(|this, _: &ToggleSidebar, _window, cx| {
                this.toggle_sidebar(cx);
            }))
            .on_action(cx.listener(|this, _: &ToggleFiles, _window, cx| {
                this.toggle_files(cx);
            }))
            .size_full()
            .relative()
            .bg(theme.background)
            .child(
                v_flex()
                    .size_full()
                    .child(
                        h_flex()
                            .id("app-shell-body")
                            .flex_1()
                            .min_w_0()
                            .min_h_0()
                            .pt(toolbar_height)
                            .overflow_hidden()
                            .child(self.render_sidebar(sidebar, cx))
                            .when(!collapsed, |el| el.child(self.render_resize_handle(cx)))
                            .child(
                                v_flex()
                                    .id("main-content")
                                    .flex_1()
                                    .h_full()
                                    .min_w_0()
                                    .min_h_0()
                                    .overflow_hidden()
                                    .child(self.chat_view.clone()),
                            )
                            .when(self.files_open, |el| {
                                el.child(
                                    div()
                                        .id("files-panel-container")
                                        .h_full()
                                        .w(px(FILES_PANEL_WIDTH))
                                        .flex_shrink_0()
                                        .border_l_1()
                                        .border_color(theme.border)
                                        .child(self.files_panel.clone()),
                                )
                            }),
                    )
                    .child(self.render_bottom_bar(cx)),
            )
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .right_0()
                    .child(self.render_top_bar(window, toolbar_height, cx)),
            )
            .when(self.settings_open, |el| {
                el.child(
                    div()
                        .id("settings-overlay")
                        .absolute()
                        .inset_0()
                        .bg(theme.background.opacity(0.8))
                        .flex()
                        .items_center()
                        .justify_center()
                        .child(
                            div()
                                .w(px(520.))
                                .rounded_lg()
                                .border_1()
                                .border_color(theme.border)
                                .shadow_lg()
                                .child(self.settings_view.clone()),
                        ),
                )
            })
            .child(self.notification_list.clone())
            .into_any_element()
    }
}

impl ChatAppShell {
    fn render_collapsed_sidebar(&self, cx: &Context<Self>) -> AnyElement {
        v_flex()
            .id("collapsed-sidebar")
            .size_full()
            .items_center()
            .justify_start()
            .py_3()
            .px_2()
            .child(
                Button::new("new-session-collapsed")
                    .ghost()
                    .small()
                    .icon(IconName::Plus)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.new_session(window, cx);
                    })),
            )
            .into_any_element()
    }

    fn render_top_bar(
        &self,
        window: &Window,
        toolbar_height: Pixels,
        cx: &Context<Self>,
    ) -> impl IntoElement {
        let theme = cx.theme();
        let username = self.auth.read(cx).username().unwrap_or_default().to_string();

        h_flex()
            .id("app-top-bar")
            .window_control_area(WindowControlArea::Drag)
            .on_mouse_down_out(cx.listener(|this, _, _window, _cx| {
                this.title_bar_should_move = false;
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = false;
                }),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _window, _cx| {
                    this.title_bar_should_move = true;
                }),
            )
            .on_mouse_move(cx.listener(|this, _, window, _cx| {
                if this.title_bar_should_move {
                    this.title_bar_should_move = false;
                    window.start_window_move();
                }
            }))
            .w_full()
            .h(toolbar_height)
            .flex_shrink_0()
            .pl(px(WINDOW_TOOLBAR_LEFT_SAFE_PADDING))
            .pr(px(WINDOW_TOOLBAR_RIGHT_SAFE_PADDING))
            .items_center()
            .justify_end()
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(self.model_selector.clone())
                    .child(
                        Button::new("toggle-files")
                            .ghost()
                            .small()
                            .when(self.files_open, |button| button.primary())
                            .child("Files")
                            .on_click(cx.listener(|this, _, _window, cx| this.toggle_files(cx))),
                    )
                    .child(
                        div()
                            .id("user-badge")
                            .px_2()
                            .py_1()
                            .rounded_full()
                            .bg(theme.muted)
                            .border_1()
                            .border_color(theme.border)
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(username),
                    )
                    .child(
                        Button::new("logout")
                            .ghost()
                            .small()
                            .child("Log out")
                            .on_click(cx.listener(|this, _, _window, cx| this.logout(cx))),
                    ),
            )
            .when(
                cfg!(target_os = "linux") && window.window_controls().window_menu,
                |title_bar| {
                    title_bar.on_mouse_down(MouseButton::Right, |event, window, _| {
                        window.show_window_menu(event.position);
                    })
                },
            )
            .child(self.render_linux_window_controls(window, cx))
    }

    fn render_linux_window_controls(&self, window: &Window, cx: &Context<Self>) -> AnyElement {
        #[cfg(target_os = "linux")]
        {
            let maximize_icon = if window.is_maximized() {
                IconName::WindowRestore
            } else {
                IconName::WindowMaximize
            };

            h_flex()
                .id("linux-window-controls")
                .items_center()
                // Keep control clicks out of the title bar's drag and maximize gestures.
                .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
                .on_mouse_down(MouseButton::Right, |_, _, cx| cx.stop_propagation())
                .gap_2()
                .ml_2()
                .child(
                    Button::new("linux-window-minimize")
                        .ghost()
                        .small()
                        .icon(IconName::WindowMinimize)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.minimize_window();
                        })),
                )
                .child(
                    Button::new("linux-window-maximize")
                        .ghost()
                        .small()
                        .icon(maximize_icon)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.zoom_window();
                        })),
                )
                .child(
                    Button::new("linux-window-close")
                        .ghost()
                        .small()
                        .icon(IconName::WindowClose)
                        .on_click(cx.listener(|_, _, window, _| {
                            window.remove_window();
                        })),
                )
                .into_any_element()
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = (window, cx);
            div().into_any_element()
        }
    }

    fn render_bottom_bar(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let sidebar_toggle_icon = if self.sidebar_collapsed {
            IconName::PanelLeftOpen
        } else {
            IconName::PanelLeftClose
        };

        h_flex()
            .id("app-bottom-bar")
            .w_full()
            .flex_shrink_0()
            .items_center()
            .gap_1()
            .px_3()
            .py_1()
            .border_t_1()
            .border_color(theme.border)
            .child(
                Button::new("sidebar-toggle")
                    .ghost()
                    .small()
                    .icon(sidebar_toggle_icon)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.toggle_sidebar(cx);
                    })),
            )
            .child(
                Button::new("sidebar-settings")
                    .ghost()
                    .small()
                    .icon(IconName::Settings)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.open_settings(cx);
                    })),
            )
            .child(
                div()
                    .id("sidebar-user-center")
                    .size(px(28.))
                    .rounded_full()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.muted)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(
                        Icon::new(IconName::CircleUser)
                            .size(px(16.))
                            .text_color(theme.foreground),
                    ),
            )
            .child(div().id("app-bottom-main-spacer").flex_1().min_w_0())
    }

    fn render_sidebar(&self, sidebar: Entity<ChatSidebar>, cx: &Context<Self>) -> impl IntoElement {
        let sidebar_width = if self.sidebar_collapsed {
            SIDEBAR_COLLAPSED_WIDTH
        } else {
            self.sidebar_width
        };
        let sidebar_content = if self.sidebar_collapsed {
            self.render_collapsed_sidebar(cx)
        } else {
            sidebar.into_any_element()
        };
        let theme = cx.theme();

        div()
            .id("sidebar-container")
            .h_full()
            .min_w_0()
            .flex_shrink_0()
            .w(px(sidebar_width))
            .overflow_hidden()
            .bg(theme.background)
            .border_r_1()
            .border_color(theme.border)
            .child(sidebar_content)
    }

    fn render_resize_handle(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        div()
            .id("sidebar-resize-handle")
            .w(px(1.0))
            .h_full()
            .flex_shrink_0()
            .cursor(CursorStyle::ResizeLeftRight)
            .bg(theme.border)
            .hover(|el| el.bg(theme.primary))
            .on_drag(SidebarResizeDrag, |_, _, _, cx| cx.new(|_| EmptyDragView))
            .on_drag_move::<SidebarResizeDrag>(cx.listener(
                |this, event: &DragMoveEvent<SidebarResizeDrag>, _window, cx| {
                    let new_width: f32 = event.event.position.x.into();
                    this.resize_sidebar(new_width, cx);
                },
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_width_is_clamped() {
        assert_eq!(compute_sidebar_width(10.0), SIDEBAR_MIN_WIDTH);
        assert_eq!(compute_sidebar_width(300.0), 300.0);
        assert_eq!(compute_sidebar_width(900.0), SIDEBAR_MAX_WIDTH);
    }
}
