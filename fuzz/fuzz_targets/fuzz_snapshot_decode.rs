#![no_main]

use libfuzzer_sys::fuzz_target;

use alb_governance::{ControllerSnapshot, DistributorController};
use alb_nullables::NullDistributor;
use alb_types::Address;

// Restoring from arbitrary bytes must fail cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    let _ = bincode::deserialize::<ControllerSnapshot>(data);

    let engine = NullDistributor::new(Address::from_low_u64(0xC0));
    if let Ok(controller) = DistributorController::restore(data, engine) {
        let bytes = controller.save_state().expect("restored state re-encodes");
        let again = DistributorController::restore(&bytes, controller.into_engine())
            .expect("re-encoded state restores");
        let _ = again.snapshot();
    }
});
