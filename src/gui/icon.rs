use crate::fortune::{FortuneItem, IconName};
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use std::path::{Path, PathBuf};

pub const ICON_SIZE: i32 = 256;

pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    lookup(icon_name.as_str())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

fn load_icon(icon_name: &IconName) -> Option<Pixbuf> {
    let path = find_icon_path(icon_name)?;
    match Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true) {
        Ok(pixbuf) => Some(pixbuf),
        Err(e) => {
            log::warn!("Failed to load icon {}: {}", path.display(), e);
            None
        }
    }
}

/// One entry per item; `None` where the item has no icon or it failed to load.
pub fn load_all(items: &[FortuneItem]) -> Vec<Option<Pixbuf>> {
    items
        .iter()
        .map(|item| item.content.icon().and_then(load_icon))
        .collect()
}
