//! Machine registry for automatic front-end discovery.
//!
//! Each machine model registers itself via [`inventory::submit!`] with a
//! [`MachineEntry`] carrying its CLI name and a factory function. The
//! front-end discovers available models at runtime without a central list.

use arnold_core::core::machine::Machine;

use crate::cpc::{Cpc, Model, RomVariant};
use crate::rom_loader::{RomLoadError, RomSet};

/// Describes a front-end-selectable machine model.
pub struct MachineEntry {
    /// CLI name used to select this model (e.g., "cpc6128").
    pub name: &'static str,
    /// Firmware image the model expects in the ROM set.
    pub rom_name: &'static str,
    /// Factory: construct a Machine from a loaded ROM set.
    pub create: fn(&RomSet) -> Result<Box<dyn Machine>, RomLoadError>,
}

inventory::collect!(MachineEntry);

fn build(model: Model, set: &RomSet) -> Result<Box<dyn Machine>, RomLoadError> {
    let mut cpc = Cpc::new(model);
    cpc.load_rom_set(set, RomVariant::English)?;
    Ok(Box::new(cpc))
}

inventory::submit! {
    MachineEntry {
        name: "cpc464",
        rom_name: "cpc464.rom",
        create: |set| build(Model::Cpc464, set),
    }
}

inventory::submit! {
    MachineEntry {
        name: "cpc664",
        rom_name: "cpc664.rom",
        create: |set| build(Model::Cpc664, set),
    }
}

inventory::submit! {
    MachineEntry {
        name: "cpc6128",
        rom_name: "cpc6128.rom",
        create: |set| build(Model::Cpc6128, set),
    }
}

/// Return all registered models, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a model by its CLI name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_models_registered() {
        let names: Vec<_> = all().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["cpc464", "cpc6128", "cpc664"]);
    }

    #[test]
    fn find_resolves_by_name() {
        assert!(find("cpc6128").is_some());
        assert!(find("spectrum48").is_none());
    }

    #[test]
    fn factory_builds_from_rom_set() {
        let firmware = vec![0u8; 0x8000];
        let set = RomSet::from_slices(&[("cpc464.rom", &firmware)]);
        let entry = find("cpc464").unwrap();
        let machine = (entry.create)(&set).unwrap();
        assert_eq!(machine.display_size().0, 1024);
    }

    #[test]
    fn factory_reports_missing_firmware() {
        let set = RomSet::from_slices(&[]);
        let entry = find("cpc6128").unwrap();
        assert!(matches!(
            (entry.create)(&set),
            Err(RomLoadError::MissingFile(_))
        ));
    }
}
