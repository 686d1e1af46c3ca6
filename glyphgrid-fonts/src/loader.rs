//! Font loading from the system font database and explicit files.

use std::path::Path;

use fontdb::{Database, Family, Query};

use crate::error::FontError;
use crate::face::FontData;

/// A loaded font together with the label used for classification.
pub(crate) struct LoadedFont {
    pub data: FontData,
    pub label: String,
}

/// Load a font from the system font database.
pub(crate) fn load_font_from_db(db: &mut Database, family_name: &str) -> Option<LoadedFont> {
    load_font_from_db_with_style(db, Family::Name(family_name), None, None)
}

/// Load the first monospace family the database knows about.
pub(crate) fn load_monospace_from_db(db: &mut Database) -> Option<LoadedFont> {
    load_font_from_db_with_style(db, Family::Monospace, None, None)
}

/// Load a font from the system font database with specific style.
///
/// Sharing the face data marks the face in `db`, hence the mutable borrow.
pub(crate) fn load_font_from_db_with_style(
    db: &mut Database,
    family: Family<'_>,
    weight: Option<fontdb::Weight>,
    style: Option<fontdb::Style>,
) -> Option<LoadedFont> {
    let query = Query {
        families: &[family],
        weight: weight.unwrap_or(fontdb::Weight::NORMAL),
        style: style.unwrap_or(fontdb::Style::Normal),
        ..Query::default()
    };

    let id = db.query(&query)?;
    let label = db
        .face(id)
        .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| db.family_name(&family).to_string());

    // SAFETY: make_shared_face_data is safe when called with a valid ID from query()
    let (data, face_index) = unsafe { db.make_shared_face_data(id)? };

    // Pass face_index for TTC (TrueType Collection) files where multiple fonts
    // share the same data but have different face indices.
    let bytes = data.as_ref().as_ref();
    let data = FontData::new_with_index(bytes.to_vec(), face_index)?;
    Some(LoadedFont { data, label })
}

/// Load a font file from disk; the label is the family name from its name
/// table, or the file stem when the table has none.
pub(crate) fn load_font_file(path: &Path) -> Result<LoadedFont, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = FontData::new(bytes)
        .ok_or_else(|| FontError::InvalidFontData(path.display().to_string()))?;
    let label = data.family_name().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(LoadedFont { data, label })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_finds_nothing() {
        let mut db = Database::new();
        assert!(load_font_from_db(&mut db, "JetBrains Mono").is_none());
        assert!(load_monospace_from_db(&mut db).is_none());
    }

    #[test]
    fn missing_font_file_is_an_io_error() {
        let err = load_font_file(Path::new("/nonexistent/font.ttf")).err();
        assert!(matches!(err, Some(FontError::Io { .. })), "got {err:?}");
    }
}
