//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous handler of `Args`.
///
/// The single seam every layer of the marketplace is built on: commands
/// placing bookings, queries quoting prices, database operations and
/// background tasks are all [`Handler`]s of their own argument types, so one
/// type may handle many of them.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Handles the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

#[cfg(test)]
mod spec {
    use std::convert::Infallible;

    use super::Handler;

    struct Rental {
        hourly_rate: u32,
    }

    struct Hours(u32);

    struct Cancel;

    impl Handler<Hours> for Rental {
        type Ok = u32;
        type Err = Infallible;

        async fn execute(&self, Hours(h): Hours) -> Result<u32, Infallible> {
            Ok(self.hourly_rate * h)
        }
    }

    impl Handler<Cancel> for Rental {
        type Ok = ();
        type Err = &'static str;

        async fn execute(&self, _: Cancel) -> Result<(), &'static str> {
            Err("already started")
        }
    }

    #[tokio::test]
    async fn dispatches_by_arguments() {
        let rental = Rental { hourly_rate: 600 };

        assert_eq!(rental.execute(Hours(3)).await, Ok(1800));
        assert_eq!(rental.execute(Cancel).await, Err("already started"));
    }
}
