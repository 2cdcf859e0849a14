//! Builtin operation definitions.
//!
//! The static table the catalog is seeded from at startup. Keys are stable
//! identifiers; renaming one is a breaking change for stored grants and
//! audit history.

use mb_common::{Operation, PermissionTypes};

/// A builtin table row: key, entity type, required permission type.
const BUILTIN: &[(&str, &str, PermissionTypes)] = &[
    // Fleet
    ("fleet.view", "motorcycle", PermissionTypes::VIEW),
    ("fleet.create", "motorcycle", PermissionTypes::CREATE),
    ("fleet.update", "motorcycle", PermissionTypes::EXECUTE),
    ("fleet.retire", "motorcycle", PermissionTypes::EXECUTE),
    // Contracts
    ("contract.view", "contract", PermissionTypes::VIEW),
    ("contract.create", "contract", PermissionTypes::CREATE),
    ("contract.close", "contract", PermissionTypes::EXECUTE),
    // Payments
    ("payment.view", "payment", PermissionTypes::VIEW),
    ("payment.create", "payment", PermissionTypes::CREATE),
    ("payment.approve", "payment", PermissionTypes::EXECUTE),
    ("payment.reject", "payment", PermissionTypes::EXECUTE),
    // Invoicing
    ("invoice.view", "invoice", PermissionTypes::VIEW),
    ("invoice.create", "invoice", PermissionTypes::CREATE),
    // HR
    ("hr.employee.view", "employee", PermissionTypes::VIEW),
    ("hr.employee.create", "employee", PermissionTypes::CREATE),
    // Parts inventory and pricing
    ("parts.view", "part", PermissionTypes::VIEW),
    ("parts.create", "part", PermissionTypes::CREATE),
    ("parts.price.update", "part", PermissionTypes::EXECUTE),
    // Import shipments
    ("shipment.view", "shipment", PermissionTypes::VIEW),
    ("shipment.create", "shipment", PermissionTypes::CREATE),
    ("shipment.receive", "shipment", PermissionTypes::EXECUTE),
    // Anomaly detection
    ("anomaly.view", "anomaly", PermissionTypes::VIEW),
    ("anomaly.resolve", "anomaly", PermissionTypes::EXECUTE),
    // Admin surface
    ("admin.operations.view", "operation", PermissionTypes::VIEW),
    ("admin.operations.register", "operation", PermissionTypes::CREATE),
    ("admin.profiles.view", "profile", PermissionTypes::VIEW),
    ("admin.profiles.manage", "profile", PermissionTypes::EXECUTE),
    ("admin.users.manage", "user", PermissionTypes::EXECUTE),
    ("admin.audit.view", "audit_entry", PermissionTypes::VIEW),
];

/// Build the builtin operations.
#[must_use]
pub fn builtin_operations() -> Vec<Operation> {
    BUILTIN
        .iter()
        .map(|(key, entity, required)| {
            Operation::new(*key, *entity, *required)
                .unwrap_or_else(|e| panic!("invalid builtin operation key {key}: {e}"))
        })
        .collect()
}
