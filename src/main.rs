use iced::keyboard::{self, key, Key};
use iced::widget::{button, column, container, horizontal_space, row, text, Column};
use iced::{window, Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod error;
mod logging;
mod scan;
mod state;
mod ui;

use config::Settings;
use scan::refresh::{refresh_library, restore_library};
use state::data::Snapshot;
use state::navigation::{Navigator, RefreshTicket};

/// Main application state
struct Gallery {
    settings: Settings,
    /// Working set, path stack and current grid
    navigator: Navigator,
    /// Status message to display to the user
    status: String,
    /// Blocking problem the user has to acknowledge (permissions, broken scan)
    alert: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Catalog read back at startup
    Restored(Result<Arc<Snapshot>, String>),
    /// User asked for a rescan
    Refresh,
    /// Background scan + persist finished
    RefreshComplete(RefreshTicket, Result<Arc<Snapshot>, String>),
    /// User clicked a folder tile
    OpenFolder(String),
    /// User clicked a photo tile
    SelectPhoto(String),
    /// Back button or Escape
    Back,
    /// User wants to browse a different folder
    ChooseRoot,
    DismissAlert,
}

impl Gallery {
    /// Create a new instance of the application
    fn new(settings: Settings) -> (Self, Task<Message>) {
        let navigator = Navigator::new(settings.root_label.clone());
        let restore = Task::perform(restore_library(settings.clone()), |result| {
            Message::Restored(result.map(Arc::new).map_err(|e| e.to_string()))
        });

        (
            Gallery {
                settings,
                navigator,
                status: "Loading catalog...".to_string(),
                alert: None,
            },
            restore,
        )
    }

    fn title(&self) -> String {
        format!("{} - Better Gallery", self.navigator.folder_title())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Restored(Ok(snapshot)) => {
                if snapshot.is_empty() {
                    // Nothing cached yet: go straight to a scan
                    return self.update(Message::Refresh);
                }
                self.navigator.restore(snapshot);
                self.status = self.summary();
                Task::none()
            }
            Message::Restored(Err(err)) => {
                warn!("⚠️  Could not read catalog: {}", err);
                self.update(Message::Refresh)
            }
            Message::Refresh => match self.navigator.begin_refresh() {
                Ok(ticket) => {
                    self.status = format!("Scanning {}...", self.settings.photo_root.display());
                    Task::perform(refresh_library(self.settings.clone()), move |result| {
                        Message::RefreshComplete(
                            ticket,
                            result.map(Arc::new).map_err(|e| e.to_string()),
                        )
                    })
                }
                Err(err) => {
                    self.status = err.to_string();
                    Task::none()
                }
            },
            Message::RefreshComplete(ticket, Ok(snapshot)) => {
                if self.navigator.finish_refresh(ticket, snapshot) {
                    self.status = self.summary();
                    info!("📊 {}", self.status);
                }
                Task::none()
            }
            Message::RefreshComplete(ticket, Err(err)) => {
                if self.navigator.abort_refresh(ticket) {
                    warn!("⚠️  Refresh failed: {}", err);
                    self.status = "Refresh failed.".to_string();
                    self.alert = Some(err);
                }
                Task::none()
            }
            Message::OpenFolder(id) => {
                self.navigator.enter(&id);
                Task::none()
            }
            Message::SelectPhoto(id) => {
                if let Some(photo) = self.navigator.snapshot().photos.iter().find(|p| p.id == id) {
                    self.status = format!(
                        "{} ({}x{}, {}, modified {})",
                        photo.name,
                        photo.width,
                        photo.height,
                        photo.mime_type,
                        photo.modified.format("%Y-%m-%d %H:%M")
                    );
                }
                Task::none()
            }
            Message::Back => {
                if self.navigator.back() {
                    Task::none()
                } else {
                    // Back at the root leaves the gallery
                    window::get_latest().and_then(window::close)
                }
            }
            Message::ChooseRoot => {
                // The new root must not race a scan of the old one
                if self.navigator.is_refreshing() {
                    self.status = "Wait for the current refresh to finish.".to_string();
                    return Task::none();
                }

                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Photo Folder")
                    .set_directory(&self.settings.photo_root)
                    .pick_folder();

                let Some(folder) = folder else {
                    return Task::none();
                };

                self.settings.photo_root = folder;
                if let Err(err) = self.settings.save() {
                    warn!("⚠️  Could not save settings: {}", err);
                }
                self.update(Message::Refresh)
            }
            Message::DismissAlert => {
                self.alert = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let back = (self.navigator.depth() > 1).then(|| {
            button("Back")
                .on_press(Message::Back)
                .padding(10)
        });

        let idle = !self.navigator.is_refreshing();
        let choose_root = button("Choose Folder")
            .on_press_maybe(idle.then_some(Message::ChooseRoot))
            .padding(10);
        let refresh = button("Refresh")
            .on_press_maybe(idle.then_some(Message::Refresh))
            .padding(10);

        let header = row![]
            .push_maybe(back)
            .push(text(self.navigator.folder_title()).size(28))
            .push(horizontal_space())
            .push(choose_root)
            .push(refresh)
            .spacing(12)
            .align_y(Alignment::Center);

        let alert = self.alert.as_ref().map(|message| {
            container(
                row![
                    text(message).size(16),
                    horizontal_space(),
                    button("Dismiss").on_press(Message::DismissAlert),
                ]
                .align_y(Alignment::Center),
            )
            .padding(10)
            .width(Length::Fill)
            .style(container::bordered_box)
        });

        let content: Column<Message> = column![header]
            .push_maybe(alert)
            .push(ui::grid_view::grid(self.navigator.items()))
            .push(text(&self.status).size(14))
            .spacing(16)
            .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
            Key::Named(key::Named::Escape) | Key::Named(key::Named::Backspace) => Some(Message::Back),
            Key::Named(key::Named::F5) => Some(Message::Refresh),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn summary(&self) -> String {
        let snapshot = self.navigator.snapshot();
        format!(
            "Ready. {} photos in {} folders.",
            snapshot.photos.len(),
            snapshot.directories.len()
        )
    }
}

fn main() -> iced::Result {
    let loaded = Settings::load();
    let settings = match &loaded {
        Ok(settings) => settings.clone(),
        Err(_) => Settings::default().with_env_override(),
    };

    logging::init_logging(&settings.log_filter);
    if let Err(err) = loaded {
        warn!("⚠️  Using default settings: {}", err);
    }
    info!("🎨 Better Gallery browsing {}", settings.photo_root.display());

    iced::application(Gallery::title, Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .subscription(Gallery::subscription)
        .centered()
        .run_with(move || Gallery::new(settings))
}
