pub mod amount;
mod invoice;
pub mod invoice_form;
mod province;

pub use invoice::{InvoiceInput, InvoiceRecord};
pub use invoice_form::{FormErrors, FormField, InvoiceForm, ItemField, LineItem, Party};
pub use province::{Province, ProvinceNameInput};
