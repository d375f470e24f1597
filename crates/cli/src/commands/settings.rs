//! Settings commands.

use std::io::Write;

use serde_json::{Map, Value};

use customshop_storefront::AppState;
use customshop_storefront::models::{SettingsPatch, SocialLinksPatch, SocialPlatform};

use super::{CliError, require_admin};
use crate::render;

pub fn show(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    require_admin(state)?;
    render::settings(out, state.settings())?;
    Ok(())
}

/// Change one setting by its stored (camelCase) name.
///
/// `value` is read as JSON when that yields a valid value for the key, and
/// as a plain string otherwise, so `set showChatbot false` and
/// `set shopName 1984` both do what they say.
///
/// Setting `backgroundImage` switches the background to the image, and
/// setting `backgroundColor` switches it back to the plain colour.
pub fn set(
    state: &mut AppState,
    out: &mut impl Write,
    key: &str,
    value: String,
) -> Result<(), CliError> {
    require_admin(state)?;
    let mut patch = parse_setting(key, value)?;
    if patch.background_image.is_some() {
        patch.use_image_background = Some(true);
    } else if patch.background_color.is_some() {
        patch.use_image_background = Some(false);
    }
    state.update_settings(patch)?;
    writeln!(out, "Updated {key}.")?;
    Ok(())
}

fn parse_setting(key: &str, value: String) -> Result<SettingsPatch, CliError> {
    if key == "socialLinks" {
        return Err(CliError::InvalidSetting(key.to_owned()));
    }

    if let Ok(json) = serde_json::from_str::<Value>(&value) {
        let patch = single_key_patch(key, json);
        if !patch.is_empty() {
            return Ok(patch);
        }
    }

    let patch = single_key_patch(key, Value::String(value));
    if patch.is_empty() {
        Err(CliError::InvalidSetting(key.to_owned()))
    } else {
        Ok(patch)
    }
}

fn single_key_patch(key: &str, value: Value) -> SettingsPatch {
    let mut map = Map::new();
    map.insert(key.to_owned(), value);
    SettingsPatch::from_json(&Value::Object(map))
}

/// Set one social link, leaving the others alone.
pub fn social(
    state: &mut AppState,
    out: &mut impl Write,
    platform: SocialPlatform,
    url: String,
) -> Result<(), CliError> {
    require_admin(state)?;
    let cleared = url.trim().is_empty();
    state.update_settings(SettingsPatch {
        social_links: Some(SocialLinksPatch::single(platform, url.trim())),
        ..SettingsPatch::default()
    })?;
    if cleared {
        writeln!(out, "Removed the {} link.", platform.key())?;
    } else {
        writeln!(out, "Updated the {} link.", platform.key())?;
    }
    Ok(())
}
