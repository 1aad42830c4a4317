use std::collections::BTreeMap;

use crate::models::amount::parse_amount;

/// Number of free-text reference notes printed under the item table
pub const NOTE_COUNT: usize = 8;
/// Unit a new line item starts with
pub const DEFAULT_UNIT: &str = "L";
/// Error key used for problems with the line items as a whole
pub const ITEMS_ERROR_KEY: &str = "items";

/// Field -> message, empty when the form can be submitted
pub type FormErrors = BTreeMap<&'static str, &'static str>;

// Scalar header fields of the form
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField {
    PreparerName,
    SenderCode,
    SenderAddress,
    SenderPhone,
    ReceiverCode,
    ReceiverAddress,
    ReceiverPhone,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::PreparerName,
        FormField::SenderCode,
        FormField::SenderAddress,
        FormField::SenderPhone,
        FormField::ReceiverCode,
        FormField::ReceiverAddress,
        FormField::ReceiverPhone,
    ];

    /// Key under which validation errors for this field are reported
    pub fn key(self) -> &'static str {
        match self {
            FormField::PreparerName => "preparer_name",
            FormField::SenderCode => "sender_code",
            FormField::SenderAddress => "sender_address",
            FormField::SenderPhone => "sender_phone",
            FormField::ReceiverCode => "receiver_code",
            FormField::ReceiverAddress => "receiver_address",
            FormField::ReceiverPhone => "receiver_phone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::PreparerName => "Prepared by",
            FormField::SenderCode => "Inventory reference code",
            FormField::SenderAddress => "Address (house no., street)",
            FormField::SenderPhone => "Contact phone",
            FormField::ReceiverCode => "Inventory code",
            FormField::ReceiverAddress => "Address",
            FormField::ReceiverPhone => "Contact phone",
        }
    }

    fn required_message(self) -> &'static str {
        match self {
            FormField::PreparerName => "Preparer name is required",
            FormField::SenderCode => "Sender code is required",
            FormField::SenderAddress => "Sender address is required",
            FormField::SenderPhone => "Sender phone is required",
            FormField::ReceiverCode => "Receiver code is required",
            FormField::ReceiverAddress => "Receiver address is required",
            FormField::ReceiverPhone => "Receiver phone is required",
        }
    }
}

// Editable columns of a line item; the total is always derived
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemField {
    Name,
    Quantity,
    Unit,
    Price,
    Note,
}

impl ItemField {
    pub const ALL: [ItemField; 5] = [
        ItemField::Name,
        ItemField::Quantity,
        ItemField::Unit,
        ItemField::Price,
        ItemField::Note,
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Party {
    pub code: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: usize,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    pub total: f64,
    pub note: String,
}

impl LineItem {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            name: String::new(),
            quantity: 0.0,
            unit: DEFAULT_UNIT.to_string(),
            price: 0.0,
            total: 0.0,
            note: String::new(),
        }
    }

    /// Text currently held by one column, as an input box would show it
    pub fn field_text(&self, field: ItemField) -> String {
        match field {
            ItemField::Name => self.name.clone(),
            ItemField::Quantity => amount_text(self.quantity),
            ItemField::Unit => self.unit.clone(),
            ItemField::Price => amount_text(self.price),
            ItemField::Note => self.note.clone(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.quantity > 0.0 && self.price > 0.0
    }
}

fn amount_text(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// The invoice being filled in.
///
/// Edits never mutate in place: each `with_*` method returns the next form and
/// leaves every untouched field equal to its previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub institution_name: String,
    pub preparer_name: String,
    pub sender: Party,
    pub receiver: Party,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub notes: [String; NOTE_COUNT],
}

impl InvoiceForm {
    pub fn new(institution_name: impl Into<String>) -> Self {
        Self {
            institution_name: institution_name.into(),
            preparer_name: String::new(),
            sender: Party::default(),
            receiver: Party::default(),
            items: vec![LineItem::new(1)],
            total: 0.0,
            notes: Default::default(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::PreparerName => &self.preparer_name,
            FormField::SenderCode => &self.sender.code,
            FormField::SenderAddress => &self.sender.address,
            FormField::SenderPhone => &self.sender.phone,
            FormField::ReceiverCode => &self.receiver.code,
            FormField::ReceiverAddress => &self.receiver.address,
            FormField::ReceiverPhone => &self.receiver.phone,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::PreparerName => &mut self.preparer_name,
            FormField::SenderCode => &mut self.sender.code,
            FormField::SenderAddress => &mut self.sender.address,
            FormField::SenderPhone => &mut self.sender.phone,
            FormField::ReceiverCode => &mut self.receiver.code,
            FormField::ReceiverAddress => &mut self.receiver.address,
            FormField::ReceiverPhone => &mut self.receiver.phone,
        }
    }

    pub fn with_field(&self, field: FormField, value: &str) -> Self {
        let mut next = self.clone();
        *next.field_mut(field) = value.to_string();
        next
    }

    /// Update one column of one line item and recompute the totals.
    ///
    /// Quantity and price are parsed leniently; unparsable text counts as zero.
    pub fn with_item_field(&self, index: usize, field: ItemField, value: &str) -> Self {
        let mut next = self.clone();
        let Some(item) = next.items.get_mut(index) else {
            return next;
        };

        match field {
            ItemField::Name => item.name = value.to_string(),
            ItemField::Quantity => item.quantity = parse_amount(value),
            ItemField::Unit => item.unit = value.to_string(),
            ItemField::Price => item.price = parse_amount(value),
            ItemField::Note => item.note = value.to_string(),
        }
        item.total = item.quantity * item.price;
        next.total = next.items_total();
        next
    }

    pub fn with_note(&self, index: usize, value: &str) -> Self {
        let mut next = self.clone();
        if let Some(note) = next.notes.get_mut(index) {
            *note = value.to_string();
        }
        next
    }

    /// Append an empty line item numbered one past the current count
    pub fn with_item_added(&self) -> Self {
        let mut next = self.clone();
        next.items.push(LineItem::new(self.items.len() + 1));
        next.total = next.items_total();
        next
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        for field in FormField::ALL {
            if self.field(field).trim().is_empty() {
                errors.insert(field.key(), field.required_message());
            }
        }

        if !self.items.iter().all(LineItem::is_complete) {
            errors.insert(
                ITEMS_ERROR_KEY,
                "All items must have a name, and quantity/price must be greater than 0",
            );
        }

        errors
    }

    fn items_total(&self) -> f64 {
        self.items.iter().map(|item| item.total).sum()
    }
}
