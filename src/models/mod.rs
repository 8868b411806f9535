pub mod batch_return;
pub mod material_dispatch;
