//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;

/// Marker type describing an entity modification.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing an expiration of something.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a confirmation of something.
#[derive(Clone, Copy, Debug)]
pub struct Confirmation;

/// Marker type describing a beginning of some activity.
#[derive(Clone, Copy, Debug)]
pub struct Commencement;

/// Marker type describing a completion of some activity.
#[derive(Clone, Copy, Debug)]
pub struct Completion;

/// Marker type describing a cancellation of something.
#[derive(Clone, Copy, Debug)]
pub struct Cancellation;

/// Marker type describing a payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// Marker type describing a response to something.
#[derive(Clone, Copy, Debug)]
pub struct Response;
