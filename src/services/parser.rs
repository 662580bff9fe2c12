use crate::error::{DwAnkiError, Result};
use crate::types::VocabularyEntry;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};
use url::Url;

const ROW_SELECTOR: &str = r#"div[class="row vocabulary "]"#;
const LESSON_LINK_SELECTOR: &str = "a[data-lesson-id]";
const GERMAN_SELECTOR: &str = r#"strong[dir="auto"]"#;
const NOTE_SELECTOR: &str = ":scope div:nth-of-type(1) > div > p";
const ENGLISH_SELECTOR: &str = ":scope div:nth-of-type(3) > div > p";
const IMAGE_SELECTOR: &str = r#"img[class="img-responsive"]"#;
const AUDIO_SELECTOR: &str = r#"source[type="audio/MP3"]"#;

/// Suffix that turns a lesson link into its vocabulary page.
pub const VOCABULARY_SUFFIX: &str = "/lv";

pub struct LessonParser {
    site: Url,
    lesson_link: Selector,
    row: Selector,
    german: Selector,
    note: Selector,
    english: Selector,
    image: Selector,
    audio: Selector,
    lesson_name: Regex,
}

impl LessonParser {
    pub fn new(site_url: &str) -> Result<Self> {
        Ok(Self {
            site: Url::parse(site_url)?,
            lesson_link: selector(LESSON_LINK_SELECTOR)?,
            row: selector(ROW_SELECTOR)?,
            german: selector(GERMAN_SELECTOR)?,
            note: selector(NOTE_SELECTOR)?,
            english: selector(ENGLISH_SELECTOR)?,
            image: selector(IMAGE_SELECTOR)?,
            audio: selector(AUDIO_SELECTOR)?,
            // Only vocabulary pages carry a lesson name; course pages do not end in /lv.
            lesson_name: Regex::new(r"/en/([^/]+)/(?:.+/)?lv/?$").map_err(|e| {
                DwAnkiError::Selector {
                    reason: format!("Invalid lesson name pattern: {}", e),
                }
            })?,
        })
    }

    /// Vocabulary page URLs for every lesson linked from the course page, in course order.
    pub fn extract_lessons(&self, content: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(content);
        let mut lessons = Vec::new();

        for link in document.select(&self.lesson_link) {
            let Some(href) = link.value().attr("href") else {
                debug!("Skipping lesson link without href");
                continue;
            };
            let lesson = self.site.join(href)?;
            lessons.push(format!(
                "{}{}",
                lesson.as_str().trim_end_matches('/'),
                VOCABULARY_SUFFIX
            ));
        }

        debug!("Found {} lesson links", lessons.len());
        Ok(lessons)
    }

    /// Parses every vocabulary row on a lesson page.
    ///
    /// Each row is extracted independently so a malformed row only surfaces
    /// when the caller reaches it.
    pub fn extract_rows(&self, content: &str) -> Vec<Result<VocabularyEntry>> {
        let document = Html::parse_document(content);
        let rows: Vec<_> = document
            .select(&self.row)
            .enumerate()
            .map(|(idx, row)| self.extract_entry(row, idx + 1))
            .collect();

        if rows.is_empty() {
            error!("No rows found with vocabulary");
        }

        rows
    }

    fn extract_entry(&self, row: ElementRef<'_>, number: usize) -> Result<VocabularyEntry> {
        Ok(VocabularyEntry {
            german: self.german_text(row, number)?,
            english: self.english_text(row, number)?,
            image_url: self.image_url(row)?,
            audio_url: self.audio_url(row),
        })
    }

    fn german_text(&self, row: ElementRef<'_>, number: usize) -> Result<String> {
        let word = row
            .select(&self.german)
            .flat_map(own_text)
            .find(|t| !t.trim().is_empty())
            .ok_or(DwAnkiError::MissingField {
                field: "German",
                row: number,
            })?
            .trim();

        let note = row
            .select(&self.note)
            .flat_map(own_text)
            .collect::<String>()
            .replace('\n', "");
        let note = note.trim();

        if note.is_empty() {
            Ok(word.to_string())
        } else {
            Ok(format!("{} <br><small><i>{}</i></small>", word, note))
        }
    }

    fn english_text(&self, row: ElementRef<'_>, number: usize) -> Result<String> {
        row.select(&self.english)
            .flat_map(own_text)
            .find(|t| !t.trim().is_empty())
            .map(|t| t.trim().to_string())
            .ok_or(DwAnkiError::MissingField {
                field: "English",
                row: number,
            })
    }

    fn image_url(&self, row: ElementRef<'_>) -> Result<Option<String>> {
        match row
            .select(&self.image)
            .find_map(|img| img.value().attr("src"))
        {
            Some(src) => Ok(Some(self.site.join(src)?.to_string())),
            None => Ok(None),
        }
    }

    fn audio_url(&self, row: ElementRef<'_>) -> Option<String> {
        row.select(&self.audio)
            .find_map(|source| source.value().attr("src"))
            .map(str::to_string)
    }

    /// The lesson segment of a vocabulary URL: `.../en/<name>/.../lv`.
    pub fn lesson_name(&self, url: &str) -> Result<String> {
        self.lesson_name
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| DwAnkiError::LessonName {
                url: url.to_string(),
            })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DwAnkiError::Selector {
        reason: format!("{}: {}", css, e),
    })
}

/// Text nodes that are direct children of `element`.
fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|text| &**text))
}
