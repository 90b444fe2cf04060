use anyhow::Result;
use minijinja::{context, Environment};

use crate::domain::device::DeviceClass;
use crate::domain::image::DisplayItem;

const GALLERY_TEMPLATE: &str = include_str!("../../templates/gallery.html");

/// Renders the gallery page for `items`, highlighting the active `screen` filter.
///
/// The `.html` template name turns on HTML auto-escaping for every value.
pub fn gallery(items: &[DisplayItem], screen: Option<&str>) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("gallery.html", GALLERY_TEMPLATE)?;

    let screens = DeviceClass::ALL.map(DeviceClass::label);
    let page = env.get_template("gallery.html")?.render(context! {
        items => items,
        screen => screen,
        screens => screens,
    })?;
    Ok(page)
}
