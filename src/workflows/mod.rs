//! Screen-scoped QR workflow handlers. All four follow the same shape:
//! decode → optional local validation → single remote call → branch on the
//! result → transition or inline error. Every error kind is absorbed here;
//! none propagate past the active screen.

pub mod cancel;
pub mod check_in;
pub mod check_out;
pub mod extend;

pub use cancel::CancelFlow;
pub use check_in::CheckInFlow;
pub use check_out::CheckOutFlow;
pub use extend::ExtendFlow;
