//! Site settings: shop identity, theme, social links.
//!
//! There is exactly one settings record and it is always complete. Stored
//! records are never used as-is: they are read as a [`SettingsPatch`] and
//! applied over [`SiteSettings::default`], one known key at a time. Unknown
//! keys and values of the wrong type are dropped, so a partial or legacy
//! record can only ever change fields it spells correctly.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use customshop_core::{ButtonRadius, FontFamily};

/// Social network a link points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Twitter,
    Linkedin,
    Tiktok,
}

impl SocialPlatform {
    /// All platforms, in display order.
    pub const ALL: [Self; 5] = [
        Self::Facebook,
        Self::Instagram,
        Self::Twitter,
        Self::Linkedin,
        Self::Tiktok,
    ];

    /// Stored key for this platform.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Tiktok => "tiktok",
        }
    }
}

impl std::str::FromStr for SocialPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| format!("unknown social platform: {s}"))
    }
}

/// Links to the shop's social profiles. Empty string means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub linkedin: String,
    pub tiktok: String,
}

impl SocialLinks {
    /// Link for `platform`.
    #[must_use]
    pub fn get(&self, platform: SocialPlatform) -> &str {
        match platform {
            SocialPlatform::Facebook => &self.facebook,
            SocialPlatform::Instagram => &self.instagram,
            SocialPlatform::Twitter => &self.twitter,
            SocialPlatform::Linkedin => &self.linkedin,
            SocialPlatform::Tiktok => &self.tiktok,
        }
    }

    fn slot(&mut self, platform: SocialPlatform) -> &mut String {
        match platform {
            SocialPlatform::Facebook => &mut self.facebook,
            SocialPlatform::Instagram => &mut self.instagram,
            SocialPlatform::Twitter => &mut self.twitter,
            SocialPlatform::Linkedin => &mut self.linkedin,
            SocialPlatform::Tiktok => &mut self.tiktok,
        }
    }

    /// Overwrite only the links present in `patch`.
    pub fn apply(&mut self, patch: SocialLinksPatch) {
        for (platform, link) in patch.links {
            *self.slot(platform) = link;
        }
    }
}

/// Partial update of [`SocialLinks`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SocialLinksPatch {
    links: Vec<(SocialPlatform, String)>,
}

impl SocialLinksPatch {
    /// Patch that sets a single link.
    #[must_use]
    pub fn single(platform: SocialPlatform, link: impl Into<String>) -> Self {
        Self::default().with(platform, link)
    }

    /// Add (or replace) a link in this patch.
    #[must_use]
    pub fn with(mut self, platform: SocialPlatform, link: impl Into<String>) -> Self {
        self.links.retain(|(p, _)| *p != platform);
        self.links.push((platform, link.into()));
        self
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Read a stored `socialLinks` object, keeping only known platforms
    /// whose value is a string.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            tracing::warn!("stored socialLinks is not an object, keeping defaults");
            return Self::default();
        };

        let mut patch = Self::default();
        for (key, raw) in map {
            let Ok(platform) = key.parse::<SocialPlatform>() else {
                tracing::warn!(key = %key, "dropping unknown social link");
                continue;
            };
            if let Some(link) = field::<String>(key, raw) {
                patch = patch.with(platform, link);
            }
        }
        patch
    }
}

/// The storefront's look and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub shop_name: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub logo_url: String,
    pub footer_text: String,
    pub background_color: String,
    pub background_image: String,
    /// Darkening applied over the background image, 0.0 to 1.0.
    pub background_overlay_opacity: f64,
    /// Use `background_image` instead of `background_color`.
    pub use_image_background: bool,
    pub accent_color: String,
    pub text_color: String,
    pub font_family: FontFamily,
    pub button_radius: ButtonRadius,
    pub social_links: SocialLinks,
    pub show_chatbot: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            shop_name: "My Custom Shop".to_owned(),
            hero_title: "Welcome to our shop".to_owned(),
            hero_subtitle: "Discover our exclusive selection.".to_owned(),
            logo_url: String::new(),
            footer_text: "All rights reserved.".to_owned(),
            background_color: "#f3f4f6".to_owned(),
            background_image: String::new(),
            background_overlay_opacity: 0.4,
            use_image_background: false,
            accent_color: "#4f46e5".to_owned(),
            text_color: "#111827".to_owned(),
            font_family: FontFamily::default(),
            button_radius: ButtonRadius::default(),
            social_links: SocialLinks::default(),
            show_chatbot: true,
        }
    }
}

impl SiteSettings {
    /// Effective settings for a stored record: defaults, overridden by
    /// every well-formed known key in `stored`.
    #[must_use]
    pub fn from_stored(stored: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(value) = stored {
            settings.apply(SettingsPatch::from_json(value));
        }
        settings
    }

    /// Shallow-merge `patch` into these settings. `social_links` merges per
    /// platform.
    pub fn apply(&mut self, patch: SettingsPatch) {
        let SettingsPatch {
            shop_name,
            hero_title,
            hero_subtitle,
            logo_url,
            footer_text,
            background_color,
            background_image,
            background_overlay_opacity,
            use_image_background,
            accent_color,
            text_color,
            font_family,
            button_radius,
            social_links,
            show_chatbot,
        } = patch;

        set(&mut self.shop_name, shop_name);
        set(&mut self.hero_title, hero_title);
        set(&mut self.hero_subtitle, hero_subtitle);
        set(&mut self.logo_url, logo_url);
        set(&mut self.footer_text, footer_text);
        set(&mut self.background_color, background_color);
        set(&mut self.background_image, background_image);
        set(&mut self.background_overlay_opacity, background_overlay_opacity);
        set(&mut self.use_image_background, use_image_background);
        set(&mut self.accent_color, accent_color);
        set(&mut self.text_color, text_color);
        set(&mut self.font_family, font_family);
        set(&mut self.button_radius, button_radius);
        set(&mut self.show_chatbot, show_chatbot);
        if let Some(links) = social_links {
            self.social_links.apply(links);
        }
    }

    /// Whether the background image is what gets shown.
    #[must_use]
    pub fn shows_background_image(&self) -> bool {
        self.use_image_background && !self.background_image.is_empty()
    }
}

/// Field-level update of [`SiteSettings`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsPatch {
    pub shop_name: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub logo_url: Option<String>,
    pub footer_text: Option<String>,
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    pub background_overlay_opacity: Option<f64>,
    pub use_image_background: Option<bool>,
    pub accent_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<FontFamily>,
    pub button_radius: Option<ButtonRadius>,
    pub social_links: Option<SocialLinksPatch>,
    pub show_chatbot: Option<bool>,
}

impl SettingsPatch {
    /// Read a stored settings object key by key.
    ///
    /// Only the keys of [`SiteSettings`] are accepted. A key whose value
    /// cannot be decoded into the field's type is skipped, as are unknown
    /// keys and non-object input.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            tracing::warn!("stored settings are not an object, using defaults");
            return Self::default();
        };

        let mut patch = Self::default();
        for (key, raw) in map {
            match key.as_str() {
                "shopName" => patch.shop_name = field(key, raw),
                "heroTitle" => patch.hero_title = field(key, raw),
                "heroSubtitle" => patch.hero_subtitle = field(key, raw),
                "logoUrl" => patch.logo_url = field(key, raw),
                "footerText" => patch.footer_text = field(key, raw),
                "backgroundColor" => patch.background_color = field(key, raw),
                "backgroundImage" => patch.background_image = field(key, raw),
                "backgroundOverlayOpacity" => {
                    patch.background_overlay_opacity = field(key, raw);
                }
                "useImageBackground" => patch.use_image_background = field(key, raw),
                "accentColor" => patch.accent_color = field(key, raw),
                "textColor" => patch.text_color = field(key, raw),
                "fontFamily" => patch.font_family = field(key, raw),
                "buttonRadius" => patch.button_radius = field(key, raw),
                "showChatbot" => patch.show_chatbot = field(key, raw),
                "socialLinks" => patch.social_links = Some(SocialLinksPatch::from_json(raw)),
                other => tracing::warn!(key = other, "dropping unknown settings key"),
            }
        }
        patch
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn field<T: DeserializeOwned>(key: &str, raw: &Value) -> Option<T> {
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring stored setting with unexpected type");
            None
        }
    }
}
