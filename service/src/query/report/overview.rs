//! [`Overview`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Booking, Equipment, User};
use crate::{
    domain::{operator, user},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] summarizing [`Booking`]s in the provided [`Scope`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Overview {
    /// [`Scope`] of the report.
    pub scope: Scope,
}

/// Part of the platform an [`Overview`] covers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// Whole platform.
    Platform,

    /// [`Booking`]s of the [`Equipment`] owned by the [`User`].
    Owner(user::Id),

    /// [`Booking`]s placed by the farmer [`User`].
    Farmer(user::Id),

    /// [`Booking`]s the [`operator::Operator`] is assigned to.
    Operator(operator::Id),
}

/// Output of the [`Overview`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// Summary of the [`Booking`]s in the [`Scope`].
    pub bookings: read::booking::Summary,

    /// Count of the listed [`Equipment`] in the [`Scope`].
    ///
    /// [`None`] for the [`Scope`]s not owning any [`Equipment`].
    pub equipment: Option<read::equipment::list::TotalCount>,
}

impl<Db> Query<Overview> for Service<Db>
where
    Db: Database<
            Select<By<read::booking::Summary, read::booking::list::Filter>>,
            Ok = read::booking::Summary,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    read::equipment::list::TotalCount,
                    read::equipment::list::Filter,
                >,
            >,
            Ok = read::equipment::list::TotalCount,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Overview { scope }: Overview,
    ) -> Result<Self::Ok, Self::Err> {
        let bookings = match scope {
            Scope::Platform => read::booking::list::Filter::default(),
            Scope::Owner(id) => read::booking::list::Filter {
                owner_id: Some(id),
                ..read::booking::list::Filter::default()
            },
            Scope::Farmer(id) => read::booking::list::Filter {
                farmer_id: Some(id),
                ..read::booking::list::Filter::default()
            },
            Scope::Operator(id) => read::booking::list::Filter {
                operator_id: Some(id),
                ..read::booking::list::Filter::default()
            },
        };
        let equipment = match scope {
            Scope::Platform => Some(read::equipment::list::Filter::default()),
            Scope::Owner(id) => Some(read::equipment::list::Filter {
                owner_id: Some(id),
                ..read::equipment::list::Filter::default()
            }),
            Scope::Farmer(_) | Scope::Operator(_) => None,
        };

        let bookings = self
            .database()
            .execute(Select(By::<read::booking::Summary, _>::new(bookings)))
            .await
            .map_err(tracerr::wrap!())?;
        let equipment = if let Some(filter) = equipment {
            Some(
                self.database()
                    .execute(Select(By::<
                        read::equipment::list::TotalCount,
                        _,
                    >::new(filter)))
                    .await
                    .map_err(tracerr::wrap!())?,
            )
        } else {
            None
        };

        Ok(Output {
            bookings,
            equipment,
        })
    }
}
