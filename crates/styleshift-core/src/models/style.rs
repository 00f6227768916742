use serde::Serialize;
use utoipa::ToSchema;

/// A catalog entry offered to the user: an identifier, a display title, and a
/// publicly readable reference image the gateway uses as the style source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StyleOption {
    pub id: &'static str,
    pub title: &'static str,
    pub image_url: &'static str,
}

/// Fixed style catalog, defined at build time and never persisted per-user.
const STYLE_CATALOG: [StyleOption; 4] = [
    StyleOption {
        id: "pop_art",
        title: "Pop Art",
        image_url: "https://njmwforcfbhxzrnntock.supabase.co/storage/v1/object/public/public_styles/styles/pop_art_style.jpg",
    },
    StyleOption {
        id: "picasso",
        title: "Cubism",
        image_url: "https://njmwforcfbhxzrnntock.supabase.co/storage/v1/object/public/public_styles/styles/picasso_style.jpg",
    },
    StyleOption {
        id: "aquarelle",
        title: "Aquarelle",
        image_url: "https://njmwforcfbhxzrnntock.supabase.co/storage/v1/object/public/public_styles/styles/aquarelle_style.JPG",
    },
    StyleOption {
        id: "van_gogh",
        title: "Van Gogh",
        image_url: "https://njmwforcfbhxzrnntock.supabase.co/storage/v1/object/public/public_styles/styles/van_gogh_style.jpg",
    },
];

/// All offered styles.
pub fn style_catalog() -> &'static [StyleOption] {
    &STYLE_CATALOG
}

/// Look up a style by its identifier.
pub fn find_style(id: &str) -> Option<&'static StyleOption> {
    STYLE_CATALOG.iter().find(|style| style.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_styles_with_unique_ids() {
        let catalog = style_catalog();
        assert_eq!(catalog.len(), 4);
        let mut ids: Vec<_> = catalog.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_find_style() {
        let style = find_style("van_gogh").expect("style exists");
        assert_eq!(style.title, "Van Gogh");
        assert!(find_style("banksy").is_none());
    }

    #[test]
    fn test_reference_images_are_absolute_urls() {
        for style in style_catalog() {
            assert!(style.image_url.starts_with("https://"), "{}", style.id);
        }
    }
}
