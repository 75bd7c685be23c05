/// Photo grid
/// Draws the presenter's cells in a wrapping grid of fixed-size tiles
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Pixels};
use iced_aw::Wrap;

use crate::state::data::{GridItem, GridItemKind};
use crate::Message;

/// Size of a grid tile's picture area (square)
const TILE_SIZE: f32 = 144.0;

/// Build the scrollable grid for the current directory
pub fn grid(items: &[GridItem]) -> Element<'_, Message> {
    if items.is_empty() {
        return container(text("No photos here.").size(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let cells: Vec<Element<'_, Message>> = items.iter().map(cell).collect();

    scrollable(
        Wrap::with_elements(cells)
            .spacing(Pixels(12.0))
            .line_spacing(Pixels(12.0)),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn cell(item: &GridItem) -> Element<'_, Message> {
    let picture: Element<'_, Message> = match (&item.kind, &item.image_locator) {
        (GridItemKind::Photo, Some(locator)) => image(Handle::from_path(locator))
            .width(TILE_SIZE)
            .height(TILE_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        // Folders (and photos without a decode target) get a placeholder
        _ => container(text(placeholder_icon(item.kind)).size(64))
            .width(TILE_SIZE)
            .height(TILE_SIZE)
            .center_x(TILE_SIZE)
            .center_y(TILE_SIZE)
            .into(),
    };

    let label = text(truncate_label(&item.name)).size(12);

    let on_press = match item.kind {
        GridItemKind::Folder => Message::OpenFolder(item.source_id.clone()),
        GridItemKind::Photo => Message::SelectPhoto(item.source_id.clone()),
    };

    button(
        column![picture, label]
            .spacing(6)
            .align_x(Alignment::Center),
    )
    .on_press(on_press)
    .padding(6)
    .into()
}

fn placeholder_icon(kind: GridItemKind) -> &'static str {
    match kind {
        GridItemKind::Folder => "📁",
        GridItemKind::Photo => "🖼",
    }
}

/// Keep labels to one tile width
fn truncate_label(name: &str) -> String {
    const MAX_CHARS: usize = 22;
    if name.chars().count() <= MAX_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(MAX_CHARS - 1).collect();
    format!("{}…", head)
}
