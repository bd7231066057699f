/// Transport-scoped photo handle (Telegram file id).
///
/// Opaque to the core: it can be re-sent or fetched through the port without
/// the core ever touching transport envelopes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhotoRef(pub String);

/// One deliverable message body, used by the broadcast fan-out.
#[derive(Clone, Debug)]
pub enum Outgoing {
    Text(String),
    Photo {
        photo: PhotoRef,
        caption: Option<String>,
    },
}
