//! Language detection for extracted page text.

use whatlang::Lang;

/// Only this many leading characters are inspected
const SAMPLE_CHARS: usize = 1000;

/// Detects the language of a text snippet
///
/// Returns `None` when the text carries no detectable language.
pub fn detect_language(text: &str) -> Option<Lang> {
    let sample: String = text.chars().take(SAMPLE_CHARS).collect();
    whatlang::detect_lang(&sample)
}

/// ISO 639-1 code for a detected language
///
/// Languages without a two-letter code keep their ISO 639-3 code.
pub fn language_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Ces => "cs",
        Lang::Slk => "sk",
        Lang::Hun => "hu",
        Lang::Ron => "ro",
        Lang::Bul => "bg",
        Lang::Ell => "el",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ind => "id",
        Lang::Cat => "ca",
        Lang::Cmn => "zh-cn",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        _ => lang.code(),
    }
}

/// Returns true for languages whose words are not space separated
pub fn is_cjk(lang: Lang) -> bool {
    matches!(lang, Lang::Cmn | Lang::Jpn | Lang::Kor)
}
