use std::borrow::Cow;

use crate::{traced_error::wrap_traced, DynError, TracedError};

mod sealed {
    pub trait Sealed {}
    impl<T, E> Sealed for Result<T, E> {}
}

/// Extension trait to enrich the error of a [`Result`] without unpacking it manually.
pub trait ResultExt<T>: sealed::Sealed {
    /// Wrap the error, if any, with the given payload and user facing message, capturing the call
    /// stack at this call site. Follows the merge semantics of [`crate::wrap`].
    fn wrap_err(
        self,
        payload: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Result<T, TracedError>;

    /// As [`Self::wrap_err`], with the message built only in the error case.
    fn wrap_err_with<M>(
        self,
        payload: impl Into<Cow<'static, str>>,
        message: impl FnOnce() -> M,
    ) -> Result<T, TracedError>
    where
        M: Into<Cow<'static, str>>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<DynError>,
{
    fn wrap_err(
        self,
        payload: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Result<T, TracedError> {
        self.map_err(|err| wrap_traced(err.into(), payload.into(), message.into()))
    }

    fn wrap_err_with<M>(
        self,
        payload: impl Into<Cow<'static, str>>,
        message: impl FnOnce() -> M,
    ) -> Result<T, TracedError>
    where
        M: Into<Cow<'static, str>>,
    {
        self.map_err(|err| wrap_traced(err.into(), payload.into(), message().into()))
    }
}
