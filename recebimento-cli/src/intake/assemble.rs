//! Build validated intake records from form input

use uuid::Uuid;

use super::catalog::Locations;
use super::types::{IntakeForm, IntakeRecord, LegacyCells, RequiredField, ValidationError};

/// Length of the short control token
pub const CONTROL_TOKEN_LEN: usize = 8;

/// Generate a fresh short control token (hex characters of a v4 UUID)
pub fn new_control_token() -> String {
    Uuid::new_v4().simple().to_string()[..CONTROL_TOKEN_LEN].to_string()
}

/// Check the parts of a form that need no reference data: required fields
/// and quantity
pub fn validate_form(form: &IntakeForm) -> Result<(), ValidationError> {
    let missing: Vec<RequiredField> = [
        (RequiredField::ProcessNumber, &form.process_number),
        (RequiredField::InvoiceNumber, &form.invoice_number),
        (RequiredField::Ni, &form.ni),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if !form.quantity.is_finite() || form.quantity < 0.0 {
        return Err(ValidationError::InvalidQuantity(form.quantity));
    }
    Ok(())
}

/// Assemble one intake record
///
/// `description` is the value the user ended up with on the form: it starts as
/// the catalog description for the NI and may have been edited. It is stored
/// as given. Key fields are stored trimmed, the way lookups and validation
/// compare them.
pub fn assemble(
    mut form: IntakeForm,
    description: String,
    locations: &Locations,
) -> Result<IntakeRecord, ValidationError> {
    validate_form(&form)?;

    for field in [
        &mut form.process_number,
        &mut form.invoice_number,
        &mut form.ni,
        &mut form.area,
    ] {
        *field = field.trim().to_string();
    }

    if !locations.accepts(&form.area) {
        return Err(ValidationError::UnknownArea {
            area: form.area,
            known: locations.names().to_vec(),
        });
    }

    let control = form
        .control
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(new_control_token);

    Ok(IntakeRecord {
        process_number: form.process_number,
        invoice_number: form.invoice_number,
        invoice_item: form.invoice_item,
        material_item: form.material_item,
        rr: form.rr,
        rr2: form.rr2,
        access_key: form.access_key,
        supplier: form.supplier,
        quantity: form.quantity,
        description,
        material_type: form.material_type,
        ni: form.ni,
        pallet_measure: form.pallet_measure,
        scheduled: form.scheduled,
        receiver: form.receiver,
        status: form.status,
        area: form.area,
        observation: form.observation,
        control,
        date: Some(form.date),
        unique_id: Uuid::new_v4().to_string(),
        test_period: form.test_period,
        legacy: LegacyCells::default(),
    })
}
