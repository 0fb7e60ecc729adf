/// Suffix appended to a compound identifier to name its docking output.
pub const DOCKED_SUFFIX: &str = "_docked";

/// Extension used for docking artifacts unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "pdbqt";

pub fn artifact_file_name(compound: &str, extension: &str) -> String {
    format!("{compound}{DOCKED_SUFFIX}.{extension}")
}

/// Recovers the compound identifier from an artifact file name, or `None` if the name
/// does not follow `<compound>_docked.<extension>`.
pub fn compound_from_file_name<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let without_ext = file_name
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    let compound = without_ext.strip_suffix(DOCKED_SUFFIX)?;
    (!compound.is_empty()).then_some(compound)
}
