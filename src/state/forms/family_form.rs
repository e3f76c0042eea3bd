//! Family edit form

use super::field::FormField;
use crate::state::{Family, FamilyUpdate};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Editable fields of a family, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Name,
    Address,
    State,
    City,
    District,
    PhoneNumber,
    Hamlet,
    Neighbourhood,
    PostalCode,
}

impl FieldId {
    pub const ALL: [FieldId; 9] = [
        FieldId::Name,
        FieldId::Address,
        FieldId::State,
        FieldId::City,
        FieldId::District,
        FieldId::PhoneNumber,
        FieldId::Hamlet,
        FieldId::Neighbourhood,
        FieldId::PostalCode,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Draft of a family's editable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyForm {
    pub name: FormField,
    pub address: FormField,
    pub state: FormField,
    pub city: FormField,
    pub district: FormField,
    pub phone_number: FormField,
    pub hamlet: FormField,
    pub neighbourhood: FormField,
    pub postal_code: FormField,
    /// Index into `FieldId::ALL`; one past the end is the submit button
    pub active_field_index: usize,
}

impl FamilyForm {
    pub fn new() -> Self {
        Self {
            name: FormField::text("name", "Nama Keluarga", "Harap isi nama keluarga"),
            address: FormField::textarea("address", "Alamat Lengkap", "Harap isi alamat lengkap"),
            state: FormField::select("state_id", "Provinsi"),
            city: FormField::select("city_id", "Kota/Kabupaten"),
            district: FormField::text("district", "Kecamatan", "Harap isi kecamatan"),
            phone_number: FormField::text(
                "familyPhoneNumber",
                "No Telfon Keluarga",
                "Harap isi no telfon keluarga",
            ),
            hamlet: FormField::text("hamlet", "RW", "Harap isi RW"),
            neighbourhood: FormField::text("neighbourhood", "RT", "Harap isi RT"),
            postal_code: FormField::text("postalCode", "Kode Pos", "Harap isi kode pos"),
            active_field_index: 0,
        }
    }

    /// Populate every field from a fetched record
    pub fn from_family(family: &Family) -> Self {
        let mut form = Self::new();
        form.name.set_text(family.name.clone());
        form.address.set_text(family.address.clone());
        form.state.set_selected(family.state_id);
        form.city.set_selected(family.city_id);
        form.district.set_text(family.district.clone());
        form.phone_number.set_text(family.family_phone_number.clone());
        form.hamlet.set_text(family.hamlet.clone().unwrap_or_default());
        form.neighbourhood
            .set_text(family.neighbourhood.clone().unwrap_or_default());
        form.postal_code.set_text(family.postal_code.clone());
        form
    }

    pub fn field(&self, id: FieldId) -> &FormField {
        match id {
            FieldId::Name => &self.name,
            FieldId::Address => &self.address,
            FieldId::State => &self.state,
            FieldId::City => &self.city,
            FieldId::District => &self.district,
            FieldId::PhoneNumber => &self.phone_number,
            FieldId::Hamlet => &self.hamlet,
            FieldId::Neighbourhood => &self.neighbourhood,
            FieldId::PostalCode => &self.postal_code,
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FormField {
        match id {
            FieldId::Name => &mut self.name,
            FieldId::Address => &mut self.address,
            FieldId::State => &mut self.state,
            FieldId::City => &mut self.city,
            FieldId::District => &mut self.district,
            FieldId::PhoneNumber => &mut self.phone_number,
            FieldId::Hamlet => &mut self.hamlet,
            FieldId::Neighbourhood => &mut self.neighbourhood,
            FieldId::PostalCode => &mut self.postal_code,
        }
    }

    /// The focused field, or `None` when the submit button has focus
    pub fn active_field_id(&self) -> Option<FieldId> {
        FieldId::ALL.get(self.active_field_index).copied()
    }

    pub fn is_submit_row_active(&self) -> bool {
        self.active_field_index == FieldId::ALL.len()
    }

    /// Build the partial update payload. `None` while either locality
    /// reference is missing.
    pub fn to_update(&self) -> Option<FamilyUpdate> {
        Some(FamilyUpdate {
            name: self.name.as_text().to_string(),
            state_id: self.state.as_selected()?,
            city_id: self.city.as_selected()?,
            address: self.address.as_text().to_string(),
            district: self.district.as_text().to_string(),
            postal_code: self.postal_code.as_text().to_string(),
            family_phone_number: self.phone_number.as_text().to_string(),
            hamlet: self.hamlet.as_text().to_string(),
            neighbourhood: self.neighbourhood.as_text().to_string(),
        })
    }
}

impl Default for FamilyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for FamilyForm {
    fn field_count(&self) -> usize {
        FieldId::ALL.len() + 1 // fields + submit button
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(FieldId::ALL.len());
    }
}
