use super::{AbiLayoutData, EngineCore};

/// Widen the live class indices into the f32 transfer buffer.
///
/// The buffer only grows; rows past `count` are left over from earlier
/// frames and are not part of the returned slice.
pub(super) fn extract_class_indices(engine: &mut EngineCore) -> &[f32] {
    let count = engine.store.count();
    let buffer = &mut engine.render.class_buffer;
    if buffer.len() < count {
        buffer.resize(count, 0.0);
    }

    for (dst, &class) in buffer[..count].iter_mut().zip(engine.store.classes()) {
        *dst = class as f32;
    }

    &engine.render.class_buffer[..count]
}

pub(super) fn abi_layout_data(engine: &EngineCore) -> AbiLayoutData {
    let positions = engine.store.positions();
    let classes = engine.store.classes();
    let count = engine.store.count();
    // Only the prefix written by the last extract is meaningful
    let widened = count.min(engine.render.class_buffer.len());

    AbiLayoutData {
        positions_ptr: positions.as_ptr(),
        positions_len_elements: positions.len(),
        positions_len_bytes: std::mem::size_of_val(positions),
        classes_ptr: classes.as_ptr(),
        classes_len_elements: classes.len(),
        classes_len_bytes: classes.len(),
        class_buffer_ptr: engine.render.class_buffer.as_ptr(),
        class_buffer_len_elements: widened,
        class_buffer_len_bytes: widened * std::mem::size_of::<f32>(),
    }
}
