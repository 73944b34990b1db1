//! Writing exported sheets to their destination.
//!
//! An export produces two files: the PNG image and a JSON sidecar
//! (`<stem>.json`) holding the frame rectangles. Either both land or
//! neither does.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use pixelsheet_spec::{ImportHints, NamedFrameRect, SheetMetadata};
use tempfile::{NamedTempFile, TempPath};

use crate::error::ExportError;
use crate::exporter::ExportedSheet;

/// Destination for exported sheet files.
///
/// Files are staged first and only become visible at their destination on
/// [`commit`](SheetSink::commit), which places all of them or none.
pub trait SheetSink {
    /// Stages the encoded image for `path`.
    fn stage_image(&mut self, path: &Path, bytes: &[u8]) -> Result<(), ExportError>;

    /// Stages the metadata sidecar for `path`.
    fn stage_metadata(&mut self, path: &Path, metadata: &SheetMetadata) -> Result<(), ExportError>;

    /// Moves every staged file into place. On failure, destinations keep
    /// the contents they had before the commit.
    fn commit(&mut self) -> Result<(), ExportError>;

    /// Drops every staged file without touching any destination.
    fn abort(&mut self);
}

/// Downstream hook that turns a written sheet into sliced sprites.
pub trait SpriteImporter {
    /// Imports `image_path` using the given frame rectangles.
    fn import(
        &mut self,
        image_path: &Path,
        frames: &[NamedFrameRect],
        hints: &ImportHints,
    ) -> Result<(), ExportError>;
}

/// Paths and hash of a sheet that was written successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenSheet {
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
    /// BLAKE3 hash of the image bytes.
    pub hash: String,
    pub metadata: SheetMetadata,
}

impl WrittenSheet {
    /// Hands the sheet to a sprite importer.
    pub fn import_with<I: SpriteImporter + ?Sized>(&self, importer: &mut I) -> Result<(), ExportError> {
        importer.import(&self.image_path, &self.metadata.frames, &self.metadata.import)
    }
}

/// Sidecar path for an image: same directory and stem, `.json` extension.
///
/// An image path that already ends in `.json` is rejected, since the
/// sidecar would overwrite it.
pub fn metadata_path_for(image_path: &Path) -> Result<PathBuf, ExportError> {
    let is_json = image_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if image_path.file_stem().is_none() || is_json {
        return Err(ExportError::InvalidPath {
            path: image_path.to_path_buf(),
        });
    }
    Ok(image_path.with_extension("json"))
}

/// Stages the image and metadata, then commits both. Any failure aborts
/// the export and leaves existing files as they were.
pub fn write_sheet<S: SheetSink + ?Sized>(
    sink: &mut S,
    image_path: &Path,
    sheet: &ExportedSheet,
) -> Result<WrittenSheet, ExportError> {
    let metadata_path = metadata_path_for(image_path)?;

    let result = sink
        .stage_image(image_path, &sheet.png)
        .and_then(|()| sink.stage_metadata(&metadata_path, &sheet.metadata))
        .and_then(|()| sink.commit());
    if let Err(err) = result {
        sink.abort();
        return Err(err);
    }

    info!(
        "wrote sheet {} ({} frames) and {}",
        image_path.display(),
        sheet.metadata.frame_count,
        metadata_path.display()
    );
    Ok(WrittenSheet {
        image_path: image_path.to_path_buf(),
        metadata_path,
        hash: sheet.hash.clone(),
        metadata: sheet.metadata.clone(),
    })
}

/// A fully written temporary file waiting to be renamed onto `path`.
#[derive(Debug)]
struct StagedFile {
    path: PathBuf,
    file: NamedTempFile,
}

/// A destination replaced during a commit, with the file it replaced.
struct Replaced {
    path: PathBuf,
    backup: Option<TempPath>,
}

impl Replaced {
    fn restore(self) {
        let result = match self.backup {
            Some(backup) => backup.persist(&self.path).map_err(|e| e.error),
            None => fs::remove_file(&self.path),
        };
        if let Err(err) = result {
            warn!("failed to restore {}: {}", self.path.display(), err);
        }
    }
}

/// Writes to the local filesystem through temporary files in each
/// destination directory, renamed into place on commit.
#[derive(Debug, Default)]
pub struct FsSheetSink {
    staged: Vec<StagedFile>,
}

impl FsSheetSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn parent_dir(path: &Path) -> Result<&Path, ExportError> {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => Ok(p),
            Some(_) => Ok(Path::new(".")),
            None => Err(ExportError::InvalidPath {
                path: path.to_path_buf(),
            }),
        }
    }

    fn stage(&mut self, path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
        let parent = Self::parent_dir(path)?;
        fs::create_dir_all(parent).map_err(|e| ExportError::write(parent, e))?;

        let mut file = NamedTempFile::new_in(parent).map_err(|e| ExportError::write(path, e))?;
        file.write_all(bytes).map_err(|e| ExportError::write(path, e))?;
        file.as_file().sync_all().map_err(|e| ExportError::write(path, e))?;
        self.staged.push(StagedFile {
            path: path.to_path_buf(),
            file,
        });
        Ok(())
    }

    /// Renames a staged file onto its destination, moving any existing file
    /// aside first so it can be put back.
    fn replace(staged: StagedFile) -> Result<Replaced, ExportError> {
        let StagedFile { path, file } = staged;
        let backup = if path.is_file() {
            let parent = Self::parent_dir(&path)?;
            let backup = tempfile::Builder::new()
                .prefix(".pixelsheet-backup")
                .tempfile_in(parent)
                .map_err(|e| ExportError::write(&path, e))?
                .into_temp_path();
            fs::rename(&path, &backup).map_err(|e| ExportError::write(&path, e))?;
            Some(backup)
        } else {
            None
        };

        if let Err(err) = file.persist(&path) {
            if backup.is_some() {
                Replaced {
                    path: path.clone(),
                    backup,
                }
                .restore();
            }
            return Err(ExportError::write(path, err.error));
        }
        Ok(Replaced { path, backup })
    }
}

impl SheetSink for FsSheetSink {
    fn stage_image(&mut self, path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
        self.stage(path, bytes)
    }

    fn stage_metadata(&mut self, path: &Path, metadata: &SheetMetadata) -> Result<(), ExportError> {
        let json = metadata.to_json_pretty().map_err(ExportError::Metadata)?;
        self.stage(path, json.as_bytes())
    }

    fn commit(&mut self) -> Result<(), ExportError> {
        let mut replaced = Vec::new();
        for staged in std::mem::take(&mut self.staged) {
            match Self::replace(staged) {
                Ok(done) => replaced.push(done),
                Err(err) => {
                    for done in replaced.into_iter().rev() {
                        done.restore();
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn abort(&mut self) {
        self.staged.clear();
    }
}

/// Keeps written files in memory, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemorySheetSink {
    pub files: BTreeMap<PathBuf, Vec<u8>>,
    staged: Vec<(PathBuf, Vec<u8>)>,
}

impl MemorySheetSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }
}

impl SheetSink for MemorySheetSink {
    fn stage_image(&mut self, path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
        self.staged.push((path.to_path_buf(), bytes.to_vec()));
        Ok(())
    }

    fn stage_metadata(&mut self, path: &Path, metadata: &SheetMetadata) -> Result<(), ExportError> {
        let json = metadata.to_json_pretty().map_err(ExportError::Metadata)?;
        self.staged.push((path.to_path_buf(), json.into_bytes()));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ExportError> {
        self.files.extend(self.staged.drain(..));
        Ok(())
    }

    fn abort(&mut self) {
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::exporter::export;
    use crate::packer::SheetLayout;

    fn exported() -> ExportedSheet {
        let layout = SheetLayout::new(2, 32, 32);
        let pixels = PixelBuffer::try_transparent(64, 32).unwrap();
        export(&pixels, &layout).unwrap()
    }

    /// Accepts images but refuses metadata.
    #[derive(Default)]
    struct BrokenMetadata {
        inner: MemorySheetSink,
    }

    impl SheetSink for BrokenMetadata {
        fn stage_image(&mut self, path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
            self.inner.stage_image(path, bytes)
        }
        fn stage_metadata(&mut self, path: &Path, _: &SheetMetadata) -> Result<(), ExportError> {
            Err(ExportError::write(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
        fn commit(&mut self) -> Result<(), ExportError> {
            self.inner.commit()
        }
        fn abort(&mut self) {
            self.inner.abort()
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_metadata_path() {
        assert_eq!(
            metadata_path_for(Path::new("out/walk.png")).unwrap(),
            PathBuf::from("out/walk.json")
        );
        assert_eq!(metadata_path_for(Path::new("walk")).unwrap(), PathBuf::from("walk.json"));
        assert!(metadata_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_json_image_path_is_rejected() {
        for path in ["sheet.json", "out/sheet.JSON"] {
            let err = metadata_path_for(Path::new(path)).unwrap_err();
            assert!(matches!(err, ExportError::InvalidPath { .. }), "{}", path);
        }

        let mut sink = MemorySheetSink::new();
        assert!(write_sheet(&mut sink, Path::new("sheet.json"), &exported()).is_err());
        assert!(sink.files.is_empty());
    }

    #[test]
    fn test_memory_sink_gets_both_files() {
        let mut sink = MemorySheetSink::new();
        let sheet = exported();
        let written = write_sheet(&mut sink, Path::new("walk.png"), &sheet).unwrap();

        assert_eq!(sink.get("walk.png"), Some(sheet.png.as_slice()));
        let json = std::str::from_utf8(sink.get("walk.json").unwrap()).unwrap();
        assert_eq!(SheetMetadata::from_json(json).unwrap(), sheet.metadata);
        assert_eq!(written.hash, sheet.hash);
    }

    #[test]
    fn test_metadata_failure_discards_image() {
        let mut sink = BrokenMetadata::default();
        let err = write_sheet(&mut sink, Path::new("walk.png"), &exported()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert!(sink.inner.files.is_empty());

        // Nothing staged survives into a later export.
        write_sheet(&mut sink.inner, Path::new("run.png"), &exported()).unwrap();
        assert_eq!(sink.inner.files.len(), 2);
        assert!(sink.inner.get("walk.png").is_none());
    }

    #[test]
    fn test_failed_commit_keeps_previous_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("walk.png");
        fs::write(&image, b"previous sheet").unwrap();
        // A directory in the sidecar's place makes the metadata rename fail.
        fs::create_dir(dir.path().join("walk.json")).unwrap();

        let err = write_sheet(&mut FsSheetSink::new(), &image, &exported()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert_eq!(fs::read(&image).unwrap(), b"previous sheet");
        assert_eq!(file_names(dir.path()), vec!["walk.json", "walk.png"]);
    }

    #[test]
    fn test_failed_commit_removes_new_image() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("walk.json")).unwrap();

        let image = dir.path().join("walk.png");
        assert!(write_sheet(&mut FsSheetSink::new(), &image, &exported()).is_err());
        assert!(!image.exists());
        assert_eq!(file_names(dir.path()), vec!["walk.json"]);
    }

    #[test]
    fn test_fs_sink_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("sheets").join("walk.png");
        let sheet = exported();

        let written = write_sheet(&mut FsSheetSink::new(), &image, &sheet).unwrap();
        assert_eq!(fs::read(&image).unwrap(), sheet.png);
        let json = fs::read_to_string(&written.metadata_path).unwrap();
        assert_eq!(SheetMetadata::from_json(&json).unwrap(), sheet.metadata);

        // Only the two final files remain; temporaries were renamed away.
        assert_eq!(file_names(&dir.path().join("sheets")), vec!["walk.json", "walk.png"]);
    }

    #[test]
    fn test_fs_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("walk.png");
        fs::write(&image, b"stale").unwrap();

        write_sheet(&mut FsSheetSink::new(), &image, &exported()).unwrap();
        assert_ne!(fs::read(&image).unwrap(), b"stale");
        assert_eq!(file_names(dir.path()), vec!["walk.json", "walk.png"]);
    }

    #[test]
    fn test_importer_receives_frames() {
        #[derive(Default)]
        struct Recorder {
            calls: Vec<(PathBuf, Vec<String>)>,
        }
        impl SpriteImporter for Recorder {
            fn import(
                &mut self,
                image_path: &Path,
                frames: &[NamedFrameRect],
                hints: &ImportHints,
            ) -> Result<(), ExportError> {
                assert!(hints.truecolor);
                self.calls.push((image_path.to_path_buf(), frames.iter().map(|f| f.name.clone()).collect()));
                Ok(())
            }
        }

        let mut sink = MemorySheetSink::new();
        let written = write_sheet(&mut sink, Path::new("a/walk.png"), &exported()).unwrap();
        let mut importer = Recorder::default();
        written.import_with(&mut importer).unwrap();
        assert_eq!(
            importer.calls,
            vec![(PathBuf::from("a/walk.png"), vec!["Sprite_0".to_string(), "Sprite_1".to_string()])]
        );
    }
}
