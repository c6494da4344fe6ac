use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{info, warn};

use crate::config::ImageConfig;
use crate::error::EntryError;
use crate::io::{KeySource, TermStore};
use crate::models::{EntryPaths, artifact_present};
use crate::services::{ImageResult, ImageSearch};

const HELP: &str = "0-9 = pick image, s = new search, n = skip word, q = quit";

/// Result of the image stage
#[derive(Debug, Default)]
pub struct ImagesResult {
    pub saved: usize,
    /// Entries the operator skipped or whose search failed
    pub skipped: usize,
    /// Whether the operator quit before the last entry
    pub quit: bool,
}

enum Pick {
    Saved,
    Skipped,
    Quit,
}

/// Execute the image stage: pick an image for every entry with a
/// flashcard record and no image yet
pub async fn execute_images<S: ImageSearch>(
    search: &S,
    store: &TermStore,
    keys: &mut dyn KeySource,
    config: &ImageConfig,
) -> Result<ImagesResult> {
    let mut result = ImagesResult::default();

    let pending: Vec<EntryPaths> = store
        .entries()?
        .into_iter()
        .filter(|p| artifact_present(&p.flashcard()) && !artifact_present(&p.image()))
        .collect();
    info!("Images: {} entries need an image", pending.len());

    for (i, paths) in pending.iter().enumerate() {
        let record = match store.load_flashcard(paths) {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: {:#}", paths.id, e);
                result.skipped += 1;
                continue;
            }
        };

        println!();
        println!(
            "[{}/{}] {}  {}",
            i + 1,
            pending.len(),
            style(&record.term).bold(),
            style(&record.definitions).italic()
        );

        match pick_image(search, keys, paths, &record.image_search_query, config).await? {
            Pick::Saved => result.saved += 1,
            Pick::Skipped => result.skipped += 1,
            Pick::Quit => {
                result.quit = true;
                break;
            }
        }
    }

    info!(
        "Images: {} saved, {} skipped{}",
        result.saved,
        result.skipped,
        if result.quit { " (quit early)" } else { "" }
    );
    Ok(result)
}

async fn pick_image<S: ImageSearch>(
    search: &S,
    keys: &mut dyn KeySource,
    paths: &EntryPaths,
    initial_query: &str,
    config: &ImageConfig,
) -> Result<Pick> {
    let mut query = initial_query.to_string();

    'search: loop {
        let results = match search.search(&query, config.results).await {
            Ok(results) => results,
            Err(e) => {
                warn!("{}: image search failed: {:#}", paths.id, e);
                return Ok(Pick::Skipped);
            }
        };
        print_results(&query, &results);

        loop {
            let key = keys.read_key()?;
            match key {
                'q' => return Ok(Pick::Quit),
                'n' => return Ok(Pick::Skipped),
                's' => {
                    let new_query = keys.read_line("New search query: ")?;
                    if !new_query.is_empty() {
                        query = new_query;
                    }
                    continue 'search;
                }
                _ => {}
            }

            let Some(choice) = key.to_digit(10).and_then(|d| results.get(d as usize)) else {
                println!("{}", HELP);
                continue;
            };

            match fetch_and_save(search, choice, &paths.image(), config.max_dimension).await {
                Ok(()) => {
                    info!("{}: saved image from {}", paths.id, choice.full_url);
                    return Ok(Pick::Saved);
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!("{}: {}", paths.id, e);
                    print_results(&query, &results);
                }
            }
        }
    }
}

async fn fetch_and_save<S: ImageSearch>(
    search: &S,
    choice: &ImageResult,
    path: &Path,
    max_dimension: u32,
) -> Result<(), EntryError> {
    let bytes = search
        .download(&choice.full_url)
        .await
        .map_err(EntryError::Service)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| EntryError::validation(format!("cannot decode image: {}", e)))?;
    save_png(image, path, max_dimension).map_err(EntryError::Io)
}

/// Shrink to fit within `max_dimension` (never enlarge) and write as PNG
///
/// The file is encoded next to `path` and renamed into place, so a failed
/// write never leaves a partial image behind.
pub fn save_png(image: DynamicImage, path: &Path, max_dimension: u32) -> Result<()> {
    let image = fit_within(image, max_dimension);
    let image = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    image
        .write_to(&mut temp, ImageFormat::Png)
        .with_context(|| format!("Failed to encode image for {:?}", path))?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("Failed to write image: {:?}", path))?;
    Ok(())
}

fn fit_within(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return image;
    }
    image.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}

fn print_results(query: &str, results: &[ImageResult]) {
    println!("Search: {}", style(query).cyan());
    if results.is_empty() {
        println!("  No results.");
    }
    for (i, result) in results.iter().enumerate() {
        println!(
            "  {}. {} ({}x{} {})",
            i,
            result.title,
            result.width,
            result.height,
            result.file_format
        );
        println!("     {}", style(&result.full_url).dim());
    }
    println!("{}", style(HELP).dim());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ScriptedKeys;
    use crate::models::{EntryId, ExampleSentence, FlashcardRecord};
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 10, 10])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[derive(Default)]
    struct FakeSearch {
        queries: RefCell<Vec<String>>,
    }

    impl ImageSearch for FakeSearch {
        async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageResult>> {
            self.queries.borrow_mut().push(query.to_string());
            let results = ["broken", "garbage", "good"]
                .iter()
                .map(|name| ImageResult {
                    title: name.to_string(),
                    full_url: format!("https://img.test/{}", name),
                    width: 1600,
                    height: 1200,
                    file_format: "png".to_string(),
                })
                .take(count as usize)
                .collect();
            Ok(results)
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>> {
            match url.rsplit('/').next() {
                Some("good") => Ok(png_bytes(1600, 1200)),
                Some("garbage") => Ok(b"<html>".to_vec()),
                _ => anyhow::bail!("404 Not Found"),
            }
        }
    }

    fn store_with_cards(words: &[&str]) -> (tempfile::TempDir, TermStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::new(dir.path().join("terms"));
        for word in words {
            let paths = store.paths(&EntryId::new(*word));
            std::fs::create_dir_all(&paths.dir).unwrap();
            let record = FlashcardRecord {
                term: word.to_string(),
                definitions: "thing".to_string(),
                frequency_rating: 5,
                example_sentences: vec![ExampleSentence {
                    es: "Hola.".to_string(),
                    en: "Hello.".to_string(),
                }],
                image_search_query: format!("a {}", word),
                part_of_speech: "noun".to_string(),
                gender: None,
            };
            store.save_flashcard(&paths, &record).unwrap();
        }
        (dir, store)
    }

    #[tokio::test]
    async fn test_failed_picks_reshow_then_save_resized() {
        let (_dir, store) = store_with_cards(&["casa"]);
        let mut keys = ScriptedKeys::new("012");

        let result = execute_images(&FakeSearch::default(), &store, &mut keys, &ImageConfig::default())
            .await
            .unwrap();

        assert_eq!(result.saved, 1);
        let path = store.paths(&EntryId::new("casa")).image();
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (800, 600));
    }

    #[tokio::test]
    async fn test_new_search_skip_and_quit() {
        let (_dir, store) = store_with_cards(&["casa", "gato", "perro"]);
        let search = FakeSearch::default();
        let mut keys = ScriptedKeys::new("snq").with_lines(&["red house"]);

        let result = execute_images(&search, &store, &mut keys, &ImageConfig::default())
            .await
            .unwrap();

        assert_eq!(result.saved, 0);
        assert_eq!(result.skipped, 1);
        assert!(result.quit);
        assert_eq!(
            *search.queries.borrow(),
            vec!["a casa", "red house", "a gato"]
        );
    }

    #[tokio::test]
    async fn test_entries_with_image_or_without_card_are_not_offered() {
        let (dir, store) = store_with_cards(&["casa"]);
        std::fs::write(store.paths(&EntryId::new("casa")).image(), b"png").unwrap();
        std::fs::create_dir_all(dir.path().join("terms").join("gato")).unwrap();
        let search = FakeSearch::default();
        let mut keys = ScriptedKeys::new("");

        let result = execute_images(&search, &store, &mut keys, &ImageConfig::default())
            .await
            .unwrap();

        assert_eq!(result.saved + result.skipped, 0);
        assert!(search.queries.borrow().is_empty());
    }

    #[test]
    fn test_small_images_are_not_enlarged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(120, 40, Rgba([0, 0, 0, 128])));

        save_png(image, &path, 800).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (120, 40));
        assert!(saved.color().has_alpha());
    }

    #[test]
    fn test_save_leaves_only_the_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casa.png");
        std::fs::write(&path, b"stale").unwrap();

        save_png(DynamicImage::ImageRgb8(RgbImage::new(10, 10)), &path, 800).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("casa.png")]);
        assert_eq!(image::open(&path).unwrap().width(), 10);
    }

    #[test]
    fn test_failed_save_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("casa.png");

        let result = save_png(DynamicImage::ImageRgb8(RgbImage::new(10, 10)), &path, 800);

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_portrait_image_fits_height() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(300, 1200));
        let fitted = fit_within(image, 600);
        assert_eq!((fitted.width(), fitted.height()), (150, 600));
    }
}
