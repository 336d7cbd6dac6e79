use std::collections::HashMap;
use std::sync::OnceLock;

use itertools::Itertools;

use crate::command::{CommandDescriptor, CommandId, COMMAND_TABLE};
use crate::error::Error;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Immutable lookup surface over a command table.
///
/// Built once, then shared read-only; no locking is needed after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<CommandDescriptor>,
    by_id: HashMap<CommandId, usize>,
}

impl Registry {
    /// Builds a registry from `table`, keeping table order. A repeated id is rejected.
    pub fn from_table(table: &[CommandDescriptor]) -> Result<Self, Error> {
        if let Some(id) = table.iter().map(|desc| desc.id).duplicates().next() {
            return Err(Error::DuplicateCommand(id));
        }

        let by_id = table
            .iter()
            .enumerate()
            .map(|(index, desc)| (desc.id, index))
            .collect();

        Ok(Self {
            descriptors: table.to_vec(),
            by_id,
        })
    }

    /// The process-wide registry over the built-in command table.
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(build_registry)
    }

    pub fn lookup_by_id(&self, id: CommandId) -> Result<&CommandDescriptor, Error> {
        self.by_id
            .get(&id)
            .map(|&index| &self.descriptors[index])
            .ok_or_else(|| Error::UnknownCommand(id.name().to_string()))
    }

    /// Lookup by symbolic name, for identifiers that come from outside the crate.
    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, Error> {
        self.lookup_by_id(name.parse()?)
    }

    /// Every descriptor using `opcode`. Subcodes are not guaranteed unique
    /// across protocol versions, so this may yield more than one.
    pub fn lookup_by_opcode(&self, opcode: u32) -> impl Iterator<Item = &CommandDescriptor> + '_ {
        self.descriptors
            .iter()
            .filter(move |desc| desc.opcode == opcode)
    }

    pub fn all_descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }
}

/// Builds the registry over the built-in command table.
///
/// # Panics
///
/// If the built-in table lists a command twice.
pub fn build_registry() -> Registry {
    match Registry::from_table(COMMAND_TABLE) {
        Ok(registry) => registry,
        Err(err) => panic!("built-in command table is inconsistent: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_command_in_order() {
        let registry = build_registry();
        let ids: Vec<CommandId> = registry.all_descriptors().iter().map(|d| d.id).collect();
        assert_eq!(ids, CommandId::ALL.to_vec());

        for id in CommandId::ALL {
            assert_eq!(registry.lookup_by_id(id).unwrap().id, id);
        }
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let table = [
            CommandDescriptor::new(CommandId::Init, "Camera control init", 0x00, 0x18, 0x1c),
            CommandDescriptor::new(CommandId::Exit, "Exit release control", 0x01, 0x18, 0x1c),
            CommandDescriptor::new(CommandId::Init, "Camera control init", 0x00, 0x18, 0x20),
        ];

        match Registry::from_table(&table) {
            Err(Error::DuplicateCommand(id)) => assert_eq!(id, CommandId::Init),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn partial_table_reports_unknown_command() {
        let table = [CommandDescriptor::new(
            CommandId::GetZoomPos,
            "Get zoom position",
            0x0b,
            0x18,
            0x20,
        )];
        let registry = Registry::from_table(&table).unwrap();

        assert!(registry.lookup_by_id(CommandId::GetZoomPos).is_ok());
        match registry.lookup_by_id(CommandId::SetZoomPos) {
            Err(Error::UnknownCommand(name)) => assert_eq!(name, "CANON_USB_CONTROL_SET_ZOOM_POS"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn opcode_lookup() {
        let registry = Registry::global();

        let found: Vec<CommandId> = registry.lookup_by_opcode(0x0c).map(|d| d.id).collect();
        assert_eq!(found, vec![CommandId::SetZoomPos]);

        assert_eq!(registry.lookup_by_opcode(0x05).count(), 0);
        assert_eq!(registry.lookup_by_opcode(0xff).count(), 0);
    }

    #[test]
    fn shared_opcode_yields_every_match() {
        let table = [
            CommandDescriptor::new(CommandId::Unknown1, "Unknown remote subcode", 0x1b, 0x08, 0x5e),
            CommandDescriptor::new(CommandId::Unknown2, "Unknown remote subcode", 0x1b, 0x00, 0x00),
        ];
        let registry = Registry::from_table(&table).unwrap();

        let found: Vec<CommandId> = registry.lookup_by_opcode(0x1b).map(|d| d.id).collect();
        assert_eq!(found, vec![CommandId::Unknown1, CommandId::Unknown2]);
    }

    #[test]
    fn lookup_by_name() {
        let registry = Registry::global();
        assert_eq!(registry.lookup("GET_EXT_PARAMS").unwrap().opcode, 0x12);
        assert!(matches!(
            registry.lookup("CANON_USB_CONTROL_FOCUS"),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn global_registry_is_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Registry::global() as *const Registry as usize))
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.iter().all_equal());
    }
}
