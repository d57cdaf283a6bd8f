//! Persistence layer
//!
//! The whole store is written to one file after every mutation. Field order:
//!
//! 1. version tag (version 2 only)
//! 2. base table
//! 3. pending change set
//! 4. enable-after-reset flag
//! 5. boot order, pending boot order
//! 6. boot options
//! 7. current boot, secure boot enable, secure boot mode
//!
//! Fields 1-4 are the core state: if they do not decode as version 2 the
//! whole payload is retried as version 1. Fields 5-7 are read best-effort and
//! keep their defaults from the first field that fails.

pub mod archive;
pub mod legacy;

use archive::{ArchiveReader, ArchiveWriter, VersionTag};
use biosconf_api::{
    BaseTable, BootOptions, BootOrder, CurrentBoot, Error, PendingAttributes, Result, SecureBootMode,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Borrowed view of everything that is persisted
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub base_table: &'a BaseTable,
    pub pending: &'a PendingAttributes,
    pub enable_after_reset: bool,
    pub boot_order: &'a BootOrder,
    pub pending_boot_order: &'a BootOrder,
    pub boot_options: &'a BootOptions,
    pub current_boot: CurrentBoot,
    pub secure_boot_enable: bool,
    pub secure_boot_mode: SecureBootMode,
}

/// Owned state decoded from an archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub base_table: BaseTable,
    pub pending: PendingAttributes,
    pub enable_after_reset: bool,
    pub boot_order: BootOrder,
    pub pending_boot_order: BootOrder,
    pub boot_options: BootOptions,
    pub current_boot: CurrentBoot,
    pub secure_boot_enable: bool,
    pub secure_boot_mode: SecureBootMode,
}

impl PersistedState {
    pub fn as_view(&self) -> StateView<'_> {
        StateView {
            base_table: &self.base_table,
            pending: &self.pending,
            enable_after_reset: self.enable_after_reset,
            boot_order: &self.boot_order,
            pending_boot_order: &self.pending_boot_order,
            boot_options: &self.boot_options,
            current_boot: self.current_boot,
            secure_boot_enable: self.secure_boot_enable,
            secure_boot_mode: self.secure_boot_mode,
        }
    }
}

/// Result of reading the persisted file at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(PersistedState),
    /// No file, or a file that could not be read
    Missing,
    /// The file was corrupt and has been deleted
    Discarded,
}

/// Encode `state` as a version 2 archive
pub fn encode(state: &StateView<'_>) -> Result<Vec<u8>> {
    let mut writer = ArchiveWriter::new();
    writer.write(&VersionTag::current())?;
    writer.write(state.base_table)?;
    writer.write(state.pending)?;
    writer.write(&state.enable_after_reset)?;
    writer.write(state.boot_order)?;
    writer.write(state.pending_boot_order)?;
    writer.write(state.boot_options)?;
    writer.write(&state.current_boot)?;
    writer.write(&state.secure_boot_enable)?;
    writer.write(&state.secure_boot_mode)?;
    Ok(writer.into_bytes())
}

/// Decode an archive of either schema version
pub fn decode(bytes: &[u8]) -> Result<PersistedState> {
    match decode_current(bytes) {
        Ok(state) => Ok(state),
        Err(err) => {
            log::warn!("Not a version {} archive ({}), retrying as version 1", archive::CURRENT_VERSION, err);
            decode_v1(bytes)
        }
    }
}

fn decode_current(bytes: &[u8]) -> Result<PersistedState> {
    let mut reader = ArchiveReader::new(bytes);
    reader.read::<VersionTag>()?.check()?;

    let mut state = PersistedState {
        base_table: reader.read()?,
        pending: reader.read()?,
        enable_after_reset: reader.read()?,
        ..PersistedState::default()
    };
    read_trailing_fields(&mut reader, &mut state);
    Ok(state)
}

fn decode_v1(bytes: &[u8]) -> Result<PersistedState> {
    let mut reader = ArchiveReader::new(bytes);
    let table: legacy::BaseTableV1 = reader.read()?;

    let mut state = PersistedState {
        base_table: legacy::upgrade(table),
        pending: reader.read()?,
        enable_after_reset: reader.read()?,
        ..PersistedState::default()
    };
    log::info!("Migrated version 1 archive with {} attributes", state.base_table.len());

    read_trailing_fields(&mut reader, &mut state);
    Ok(state)
}

fn read_trailing_fields(reader: &mut ArchiveReader<'_>, state: &mut PersistedState) {
    if reader.remaining() == 0 {
        log::debug!("Archive ends after the attribute state");
        return;
    }
    if let Err(err) = try_read_trailing_fields(reader, state) {
        log::error!("Failed to read boot and secure boot state, keeping defaults: {}", err);
    }
}

fn try_read_trailing_fields(reader: &mut ArchiveReader<'_>, state: &mut PersistedState) -> Result<()> {
    state.boot_order = reader.read()?;
    state.pending_boot_order = reader.read()?;
    state.boot_options = reader.read()?;
    state.current_boot = reader.read()?;
    state.secure_boot_enable = reader.read()?;
    state.secure_boot_mode = reader.read()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `state` to `path` through a temporary sibling file
pub fn save(path: &Path, state: &StateView<'_>) -> Result<()> {
    let bytes = encode(state)?;
    let tmp = temp_path(path);

    if let Err(err) = fs::write(&tmp, &bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Persistence(format!("{}: {}", path.display(), err)));
    }

    log::trace!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Read the persisted file, deleting it if it cannot be decoded
pub fn load(path: &Path) -> LoadOutcome {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::debug!("No persisted state at {}", path.display());
            return LoadOutcome::Missing;
        }
        Err(err) => {
            log::error!("Failed to read {}: {}", path.display(), err);
            return LoadOutcome::Missing;
        }
    };

    match decode(&bytes) {
        Ok(state) => LoadOutcome::Loaded(state),
        Err(err) => {
            log::error!("Corrupt persisted state at {}, deleting: {}", path.display(), err);
            if let Err(err) = fs::remove_file(path) {
                log::error!("Failed to delete {}: {}", path.display(), err);
            }
            LoadOutcome::Discarded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biosconf_api::{Attribute, AttributeType, AttributeValue, Bound, PendingAttribute};

    fn sample() -> PersistedState {
        let mut state = PersistedState::default();
        state.base_table.insert(
            "Mode".to_string(),
            Attribute::enumeration("On").with_bounds(vec![Bound::one_of("On", "Enabled"), Bound::one_of("Off", "")]),
        );
        state.base_table.insert("Cores".to_string(), Attribute::integer(4));
        state.pending.insert(
            "Cores".to_string(),
            PendingAttribute::new(AttributeType::Integer, AttributeValue::Integer(2)),
        );
        state.enable_after_reset = true;
        state.boot_order = vec!["disk".to_string()];
        state.secure_boot_mode = SecureBootMode::User;
        state
    }

    fn core_only_v1(state: &PersistedState) -> Vec<u8> {
        let table: legacy::BaseTableV1 = state
            .base_table
            .iter()
            .map(|(name, attr)| {
                let bounds = attr
                    .bounds
                    .iter()
                    .map(|b| legacy::BoundV1 {
                        kind: b.kind,
                        value: b.value.clone(),
                    })
                    .collect();
                let v1 = legacy::AttributeV1 {
                    attribute_type: attr.attribute_type,
                    read_only: attr.read_only,
                    display_name: attr.display_name.clone(),
                    description: attr.description.clone(),
                    menu_path: attr.menu_path.clone(),
                    current_value: attr.current_value.clone(),
                    default_value: attr.default_value.clone(),
                    bounds,
                };
                (name.clone(), v1)
            })
            .collect();

        let mut writer = ArchiveWriter::new();
        writer.write(&table).unwrap();
        writer.write(&state.pending).unwrap();
        writer.write(&state.enable_after_reset).unwrap();
        writer.into_bytes()
    }

    #[test]
    fn test_round_trip() {
        let state = sample();
        let bytes = encode(&state.as_view()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), state);
    }

    #[test]
    fn test_v1_migration() {
        let state = sample();
        let decoded = decode(&core_only_v1(&state)).unwrap();

        let mode = &decoded.base_table["Mode"];
        assert!(mode.bounds.iter().all(|b| b.selector.is_empty()));
        assert_eq!(mode.bounds[0].value, AttributeValue::from("On"));
        assert_eq!(decoded.pending, state.pending);
        assert!(decoded.enable_after_reset);
        assert!(decoded.boot_order.is_empty());
        assert_eq!(decoded.secure_boot_mode, SecureBootMode::Setup);
    }

    #[test]
    fn test_truncated_trailing_fields_keep_defaults() {
        let mut state = sample();
        state.boot_options.insert("disk".to_string(), crate::boot_option::initial_values());
        let bytes = encode(&state.as_view()).unwrap();

        // drop the final byte: secure boot mode no longer decodes
        let decoded = decode(&bytes[..bytes.len() - 1]).unwrap();
        assert_eq!(decoded.base_table, state.base_table);
        assert_eq!(decoded.boot_order, state.boot_order);
        assert_eq!(decoded.boot_options, state.boot_options);
        assert_eq!(decoded.secure_boot_mode, SecureBootMode::Setup);
    }

    #[test]
    fn test_garbage_fails() {
        assert!(decode(&[0xff; 7]).is_err());
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(temp_path(Path::new("/var/lib/x/biosData")), PathBuf::from("/var/lib/x/biosData.tmp"));
    }
}
