//! Repository implementations over the `SeaORM` entities.

pub mod account;
pub mod currency;
pub mod fx_realization;
pub mod invoice;
pub mod journal;
pub mod webhook_nonce;

pub use account::AccountRepository;
pub use currency::{CurrencyError, CurrencyRepository};
pub use fx_realization::{FxError, FxOutcome, FxRealizationRepository};
pub use invoice::{Gstr1Summary, InvoiceRepository};
pub use journal::JournalRepository;
pub use webhook_nonce::NonceRepository;
