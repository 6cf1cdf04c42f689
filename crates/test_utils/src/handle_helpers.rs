use shared_handle::SharedHandle;

/// Checks that all of the given handles share one managed object with the expected count
///
/// Panics with a message describing the first mismatching handle.
#[track_caller]
pub fn assert_shared<T: ?Sized>(handles: &[&SharedHandle<T>], expected_refs: usize) {
    let Some((first, rest)) = handles.split_first() else {
        panic!("Expected at least one handle");
    };

    for (i, handle) in handles.iter().enumerate() {
        let refs = SharedHandle::refs(handle);
        if refs != expected_refs {
            panic!("Handle {i} has a count of {refs}, expected {expected_refs}");
        }
    }

    for (i, handle) in rest.iter().enumerate() {
        if !SharedHandle::ptr_eq(first, handle) {
            panic!("Handle {} doesn't share the first handle's object", i + 1);
        }
    }
}
