use reqwest::Method;
use serde::Serialize;
use std::borrow::Cow;

/// How a request carries its payload.
pub enum RequestData<T> {
    Empty,
    Query(T),
    Json(T),
}

/// A typed endpoint of the RecordSheet JSON API.
///
/// Implementors describe where the request goes and what it carries;
/// [`crate::Client::send`] takes care of headers, CSRF and decoding.
pub trait ApiRequest {
    type Data: Serialize;
    type Response;
    const METHOD: Method = Method::GET;

    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}
