use crate::error::{AnkiError, Result};
use crate::services::anki::{FlashcardApi, NewNote};
use crate::services::fetcher::PageSource;
use crate::services::media::MediaCache;
use crate::services::parser::LessonParser;
use crate::types::{Flashcard, ImportConfig, LessonReport, RunSummary, VocabularyEntry};
use tracing::{error, info, warn};

/// Drives the whole import: course page, lessons, rows, media, notes.
pub struct Importer<S, A> {
    config: ImportConfig,
    parser: LessonParser,
    source: S,
    anki: A,
    images: MediaCache,
    audio: MediaCache,
}

enum Submission {
    Added,
    Duplicate,
    Failed,
}

impl<S: PageSource, A: FlashcardApi> Importer<S, A> {
    pub fn new(config: ImportConfig, source: S, anki: A) -> Result<Self> {
        let parser = LessonParser::new(&config.site_url)?;
        let images = MediaCache::new(config.images_dir.clone());
        let audio = MediaCache::new(config.audio_dir.clone());

        Ok(Self {
            config,
            parser,
            source,
            anki,
            images,
            audio,
        })
    }

    /// Imports every lesson of the configured course.
    ///
    /// Only note submission failures are absorbed; anything else stops the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary {
            started_at: chrono::Local::now().to_rfc3339(),
            lessons: Vec::new(),
        };

        self.images.ensure_dir().await?;
        self.audio.ensure_dir().await?;

        info!("Using lessons from: {}", self.config.course_url);
        let course = self.source.fetch_page(&self.config.course_url).await?;
        let lessons = self.parser.extract_lessons(&course)?;
        info!("Found {} lessons", lessons.len());

        for url in &lessons {
            info!("Building Anki cards from: {}", url);
            let report = self.import_lesson(url).await?;
            info!(
                "Done with lesson: {} ({} added, {} duplicates, {} failed)",
                url, report.added, report.duplicates, report.failed
            );
            summary.lessons.push(report);
        }

        Ok(summary)
    }

    pub async fn import_lesson(&self, url: &str) -> Result<LessonReport> {
        let lesson = self.parser.lesson_name(url)?;
        let page = self.source.fetch_page(url).await?;
        let rows = self.parser.extract_rows(&page);

        let mut report = LessonReport {
            lesson: lesson.clone(),
            url: url.to_string(),
            rows: rows.len(),
            ..Default::default()
        };
        let tags = vec![lesson];

        for row in rows {
            let entry = row?;
            let card = self.build_card(&entry, &tags).await?;

            match self.submit(card, &entry).await {
                Submission::Added => report.added += 1,
                Submission::Duplicate => report.duplicates += 1,
                Submission::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    /// Turns a row into a card, downloading and uploading its media on the way.
    pub async fn build_card(&self, entry: &VocabularyEntry, tags: &[String]) -> Result<Flashcard> {
        let mut front = entry.english.clone();
        let mut back = entry.german.clone();

        if let Some(url) = &entry.image_url {
            info!("Downloading image: {}", url);
            let image = self.images.fetch(&self.source, url).await?;
            front.push_str(&format!(
                "<br><img src=\"{}\" width=\"50%\" height=\"50%\">",
                image.filename
            ));
            self.anki
                .store_media_file(&image.filename, &image.data)
                .await?;
        }

        match &entry.audio_url {
            Some(url) => {
                info!("Downloading audio: {}", url);
                let audio = self.audio.fetch(&self.source, url).await?;
                self.anki
                    .store_media_file(&audio.filename, &audio.data)
                    .await?;
                back.push_str(&format!("[sound:{}]", audio.filename));
            }
            None => warn!("No audio found: {}", entry.german),
        }

        Ok(Flashcard {
            front,
            back,
            tags: tags.to_vec(),
        })
    }

    async fn submit(&self, card: Flashcard, entry: &VocabularyEntry) -> Submission {
        let has_image = card.front != entry.english;
        let note = NewNote::from_card(&self.config.deck, &self.config.model, card);

        match self.anki.add_note(&note).await {
            Ok(id) if has_image => {
                info!("Added card with image {}: {}", id, entry.english);
                Submission::Added
            }
            Ok(id) => {
                info!("Added card {}: {}", id, entry.english);
                Submission::Added
            }
            Err(AnkiError::Warning(message)) => {
                warn!("{}: {}", message, entry.english);
                Submission::Duplicate
            }
            Err(e) => {
                error!("{}: {}", e, entry.english);
                Submission::Failed
            }
        }
    }
}
