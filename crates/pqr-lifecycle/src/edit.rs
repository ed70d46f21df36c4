//! Direct field edits.

use std::str::FromStr;

use pqr_model::{CaseRecord, Catalog, DependentField, Priority, keys};

use crate::cascade::derive_pending_adjustment;
use crate::error::{LifecycleError, Result};
use crate::query::extract_related_complaint;

/// A field an operator may edit directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    /// Gated field; requires its gate.
    Dependent(DependentField),
    Priority,
    Category,
    Observations,
    CustomerName,
    SicFiling,
    DecreeDueDate,
    DueDate,
}

impl FromStr for EditField {
    type Err = LifecycleError;

    /// Parses a persisted key such as `numeroTT` or `Prioridad`.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        if let Ok(field) = key.parse::<DependentField>() {
            return Ok(EditField::Dependent(field));
        }
        match key {
            keys::PRIORITY => Ok(EditField::Priority),
            keys::CATEGORY => Ok(EditField::Category),
            keys::OBSERVATIONS => Ok(EditField::Observations),
            keys::CUSTOMER_NAME => Ok(EditField::CustomerName),
            keys::SIC_FILING => Ok(EditField::SicFiling),
            keys::DECREE_DUE_DATE => Ok(EditField::DecreeDueDate),
            keys::DUE_DATE => Ok(EditField::DueDate),
            _ => Err(LifecycleError::NotEditable(key.to_string())),
        }
    }
}

fn check_catalog(catalog: &Catalog, field: DependentField, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let (valid, name) = match field {
        DependentField::OperationType => (catalog.is_operation_type(value), "operation type"),
        DependentField::AssuranceType => (catalog.is_assurance_type(value), "assurance type"),
        DependentField::AssuranceMonth => (catalog.is_assurance_month(value), "assurance month"),
        _ => (true, ""),
    };
    if valid {
        Ok(())
    } else {
        Err(LifecycleError::NotInCatalog {
            field: name,
            value: value.to_string(),
        })
    }
}

/// Writes `value` into `field`, validating gate and catalogue.
pub(crate) fn apply_edit(
    case: &mut CaseRecord,
    catalog: &Catalog,
    field: EditField,
    value: &str,
) -> Result<()> {
    let value = value.trim();
    match field {
        EditField::Dependent(dependent) => {
            let gate = dependent.gate();
            if !gate.get(case) {
                return Err(LifecycleError::GateOff {
                    field: dependent,
                    gate,
                });
            }
            check_catalog(catalog, dependent, value)?;
            dependent.set(case, value)?;
            derive_pending_adjustment(case);
        }
        EditField::Priority => {
            let priority: Priority = value.parse()?;
            if !catalog.has_priority(priority) {
                return Err(LifecycleError::NotInCatalog {
                    field: "priority",
                    value: value.to_string(),
                });
            }
            case.priority = priority;
        }
        EditField::Category => case.category = value.to_string(),
        EditField::Observations => {
            case.observations = value.to_string();
            case.related_complaint = extract_related_complaint(value);
        }
        EditField::CustomerName => case.customer_name = value.to_uppercase(),
        EditField::SicFiling => case.sic_filing = value.to_string(),
        EditField::DecreeDueDate => case.decree_due_date = value.to_string(),
        EditField::DueDate => case.due_date = value.to_string(),
    }
    Ok(())
}
