use std::sync::Arc;

use gpui::*;
use gpui_component::notification::NotificationList;
use gpui_component::{Root, ThemeRegistry};

use skillbench::app::{ChatAppShell, NewSession, Quit, ToggleFiles, ToggleSidebar, default_themes_path};
use skillbench::settings::apply_theme;
use skillbench_workbench::{SettingsStore, SkillCatalog};

/// Bootstraps the gpui application: bundled assets, gpui-component, theme
/// watching, global key bindings and the main window wrapped in `Root`.
fn main() {
    tracing_subscriber::fmt::init();

    let catalog = match SkillCatalog::builtin() {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => {
            tracing::error!("embedded skill catalog is invalid: {error}");
            std::process::exit(1);
        }
    };
    tracing::info!("loaded {} skill packs", catalog.packs().len());

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        // Must run before any Root is created.
        gpui_component::init(cx);

        // A missing ./themes directory is not fatal; built-in themes stay available.
        if let Err(err) = ThemeRegistry::watch_dir(default_themes_path(), cx, |cx| {
            apply_theme(&SettingsStore::load().settings(), None, cx);
            tracing::info!("theme directory watch initialized");
        }) {
            tracing::warn!("failed to watch themes directory: {err}. using default themes");
            apply_theme(&SettingsStore::load().settings(), None, cx);
        }

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-n", NewSession, None),
            KeyBinding::new("cmd-b", ToggleSidebar, None),
            KeyBinding::new("cmd-e", ToggleFiles, None),
        ]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1280.), px(820.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(9.), px(9.))),
                        ..Default::default()
                    }),
                    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
                    window_decorations: Some(WindowDecorations::Client),
                    #[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
                    window_decorations: None,
                    ..Default::default()
                };

                cx.open_window(options, |window, cx| {
                    let notification_list = cx.new(|cx| NotificationList::new(window, cx));
                    let shell = cx.new(|cx| {
                        ChatAppShell::new(catalog.clone(), notification_list, window, cx)
                    });

                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });
}
