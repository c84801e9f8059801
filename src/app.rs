use std::rc::Rc;

use crate::command::Command;
use crate::editor::{Editor, LocalEditor};
use crate::harness::{self, HarnessConfig, Mounted};
use crate::relay::{Direction, RelayStats};

/// Input fields of one editor pane
#[derive(Debug, Default)]
struct PaneState {
    name: String,
    payload: String,
    error: Option<String>,
}

/// Two editors side by side, each mirroring the other.
///
/// Only the harness configuration is persisted; the editors start empty on
/// every run.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct RelayApp {
    config: HarnessConfig,
    #[serde(skip)]
    mounted: Option<Mounted<LocalEditor>>,
    #[serde(skip)]
    panes: [PaneState; 2],
    #[serde(skip)]
    mount_error: Option<String>,
}

impl Default for RelayApp {
    fn default() -> Self {
        Self {
            config: HarnessConfig::default(),
            mounted: None,
            panes: Default::default(),
            mount_error: None,
        }
    }
}

impl RelayApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config: HarnessConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        Self::with_config(config)
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        let mut app = Self {
            config,
            ..Self::default()
        };
        app.remount();
        app
    }

    fn remount(&mut self) {
        // Release the old pair before building a new one
        self.mounted = None;

        let primary = Rc::new(LocalEditor::new());
        let secondary = Rc::new(LocalEditor::new());
        match harness::mount(&self.config, Some(primary), Some(secondary)) {
            Ok(mounted) => {
                self.mounted = Some(mounted);
                self.mount_error = None;
            }
            Err(err) => {
                log::error!("Failed to mount editors: {}", err);
                self.mount_error = Some(err.to_string());
            }
        }
    }

    fn status_line(&self, stats: RelayStats) -> String {
        let labels = &self.config.relay;
        let to_secondary = stats.direction(Direction::PrimaryToSecondary);
        let to_primary = stats.direction(Direction::SecondaryToPrimary);
        format!(
            "{} → {}: {} forwarded, {} echoes dropped | {} → {}: {} forwarded, {} echoes dropped",
            labels.primary_label,
            labels.secondary_label,
            to_secondary.forwarded,
            to_secondary.dropped,
            labels.secondary_label,
            labels.primary_label,
            to_primary.forwarded,
            to_primary.dropped,
        )
    }
}

impl eframe::App for RelayApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("relay_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(mounted) = &self.mounted {
                    ui.label(self.status_line(mounted.connection().stats()));
                }
                if ui.button("Remount").clicked() {
                    self.remount();
                }
            });
        });

        let Some(mounted) = &self.mounted else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Editors are not mounted");
                if let Some(err) = &self.mount_error {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }
            });
            return;
        };

        let [primary_pane, secondary_pane] = &mut self.panes;
        egui::SidePanel::left("primary_mount")
            .resizable(true)
            .default_width(ctx.screen_rect().width() / 2.0)
            .show(ctx, |ui| {
                editor_pane(ui, &self.config.relay.primary_label, &mounted.primary, primary_pane);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            editor_pane(ui, &self.config.relay.secondary_label, &mounted.secondary, secondary_pane);
        });
    }
}

fn editor_pane(ui: &mut egui::Ui, label: &str, editor: &LocalEditor, pane: &mut PaneState) {
    ui.heading(label);
    ui.label(if editor.is_focused() { "focused" } else { "blurred" });

    ui.horizontal(|ui| {
        ui.label("Command");
        ui.text_edit_singleline(&mut pane.name);
    });
    ui.label("Payload (JSON)");
    ui.text_edit_multiline(&mut pane.payload);

    ui.horizontal(|ui| {
        if ui.button("Emit").clicked() {
            match Command::parse(&pane.name, &pane.payload) {
                Ok(command) => {
                    log::info!("{} emitting {:?}", label, command.name());
                    editor.dispatch(vec![command]);
                    pane.error = None;
                }
                Err(err) => pane.error = Some(err.to_string()),
            }
        }
        if ui.button("Focus").clicked() {
            editor.focus();
        }
        if ui.button("Blur").clicked() {
            editor.blur();
        }
    });

    if let Some(err) = &pane.error {
        ui.colored_label(ui.visuals().error_fg_color, err);
    }

    ui.separator();
    egui::ScrollArea::vertical().id_salt(label).show(ui, |ui| {
        for (index, command) in editor.commands().iter().enumerate() {
            ui.monospace(format!("{index:>3}  {command}"));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mounts_on_creation() {
        let app = RelayApp::with_config(HarnessConfig::default());
        let mounted = app.mounted.as_ref().unwrap();

        assert!(mounted.connection().is_connected());
        assert!(!mounted.secondary.is_focused());
        assert!(app.mount_error.is_none());
    }

    #[test]
    fn remount_starts_from_empty_editors() {
        let mut app = RelayApp::with_config(HarnessConfig::default());
        if let Some(mounted) = &app.mounted {
            mounted.primary.dispatch(vec![Command::new("table.add", serde_json::Value::Null)]);
            assert_eq!(mounted.secondary.len(), 1);
        }

        app.remount();

        let mounted = app.mounted.as_ref().unwrap();
        assert!(mounted.primary.is_empty());
        assert!(mounted.secondary.is_empty());
    }

    #[test]
    fn status_line_uses_configured_labels() {
        let mut config = HarnessConfig::default();
        config.relay.primary_label = "left".to_owned();
        config.relay.secondary_label = "right".to_owned();
        let app = RelayApp::with_config(config);

        let line = app.status_line(RelayStats::default());

        assert!(line.starts_with("left → right: 0 forwarded"));
        assert!(line.contains("right → left: 0 forwarded"));
    }
}
