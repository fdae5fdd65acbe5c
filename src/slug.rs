//! Idempotency keys ("slugs") of occurrences
//!
//! The slug of an occurrence is what tells whether it already exists on the remote service.
//! It must therefore only depend on the date and the title, and must never change across runs.

use crate::dates::DateDecoration;

/// Characters that are dropped from titles (rather than turned into word separators)
const STRIPPED_PUNCTUATION: &[char] = &[
    '\'', '\u{2018}', '\u{2019}', '"', '\u{201C}', '\u{201D}', '`',
    '.', ',', '!', '?', ':', ';', '(', ')', '[', ']', '{', '}', '&',
];

/// Build the slug of `title` occurring on the decorated date.
///
/// `2026-02-01-morning-service` for "Morning Service" on 1st February 2026.
pub fn build_slug(decoration: &DateDecoration, title: &str) -> String {
    let title = decode_html_entities(title);
    let title: String = title
        .chars()
        .filter(|c| STRIPPED_PUNCTUATION.contains(c) == false)
        .collect();

    // `slugify` transliterates accented characters, lowercases, turns everything else into
    // hyphens, collapses runs of hyphens and trims them at both ends
    ::slug::slugify(format!("{}-{}-{}-{}",
        decoration.yearstr,
        decoration.monthnum,
        decoration.datenum,
        title,
    ))
}

/// Replace HTML character references (`&amp;`, `&eacute;`, `&#8217;`, `&#x2019;`...) with the characters they stand for.
///
/// Every named reference of HTML5 is known. Unknown or malformed references are kept as-is.
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn deco(y: i32, m: u32, d: u32) -> DateDecoration {
        DateDecoration::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_basic_slug() {
        assert_eq!(build_slug(&deco(2026, 2, 1), "Morning Service"), "2026-02-01-morning-service");
        assert_eq!(build_slug(&deco(2026, 2, 8), "Morning Service"), "2026-02-08-morning-service");
    }

    #[test]
    fn test_slug_is_deterministic() {
        let d = deco(2026, 12, 25);
        let title = "A service of Choral Evensong (evening)";
        assert_eq!(build_slug(&d, title), build_slug(&d, title));
        assert_eq!(build_slug(&d, title), "2026-12-25-a-service-of-choral-evensong-evening");
    }

    #[test]
    fn test_accents_and_punctuation_are_normalized() {
        let d = deco(2026, 2, 1);
        assert_eq!(build_slug(&d, "Café Service"), build_slug(&d, "Cafe Service"));
        assert_eq!(build_slug(&d, "Café Service"), "2026-02-01-cafe-service");
        assert_eq!(build_slug(&d, "4 O'clock Church"), "2026-02-01-4-oclock-church");
        assert_eq!(build_slug(&d, "4 O&#8217;clock Church"), "2026-02-01-4-oclock-church");
        assert_eq!(build_slug(&d, "4 O’clock Church!"), "2026-02-01-4-oclock-church");
        assert_eq!(build_slug(&d, "  Bread &amp; Wine -- Supper  "), "2026-02-01-bread-wine-supper");
        assert_eq!(build_slug(&d, "Junior / Adult Choir"), "2026-02-01-junior-adult-choir");
    }

    #[test]
    fn test_different_titles_do_not_collide() {
        let d = deco(2026, 2, 1);
        assert_ne!(build_slug(&d, "Junior Choir Rehearsal"), build_slug(&d, "Adult Choir Rehearsal"));
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(decode_html_entities("O&#8217;clock"), "O\u{2019}clock");
        assert_eq!(decode_html_entities("O&#x2019;clock"), "O\u{2019}clock");
        assert_eq!(decode_html_entities("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(decode_html_entities("Caf&eacute;"), "Café");
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert_eq!(decode_html_entities("a &unknown; b"), "a &unknown; b");
        assert_eq!(decode_html_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_any_named_entity_is_decoded() {
        assert_eq!(decode_html_entities("Fran&ccedil;ais"), "Français");
        assert_eq!(decode_html_entities("&Eacute;glise"), "Église");
        assert_eq!(decode_html_entities("K&ouml;ln"), "Köln");

        let d = deco(2026, 2, 1);
        assert_eq!(build_slug(&d, "Fran&ccedil;ais Service"), build_slug(&d, "Français Service"));
        assert_eq!(build_slug(&d, "Fran&ccedil;ais Service"), "2026-02-01-francais-service");
        assert_eq!(build_slug(&d, "&Eacute;glise Service"), build_slug(&d, "Église Service"));
        assert_eq!(build_slug(&d, "&Eacute;glise Service"), "2026-02-01-eglise-service");
        assert_eq!(build_slug(&d, "K&ouml;ln Evensong"), build_slug(&d, "Köln Evensong"));
    }
}
