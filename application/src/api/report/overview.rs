//! [`Overview`] report definition.

use std::sync::OnceLock;

use common::Money;
use juniper::graphql_object;
use service::{domain::booking, query};

use crate::{api, Context};

/// Report summarizing `Booking`s visible to the current `User`.
#[derive(Clone, Debug)]
pub struct Overview {
    /// Underlying [`query::report::overview::Output`].
    output: query::report::overview::Output,

    /// [`Row`]s of this report.
    rows: OnceLock<Vec<Row>>,
}

impl From<query::report::overview::Output> for Overview {
    fn from(output: query::report::overview::Output) -> Self {
        Self {
            output,
            rows: OnceLock::new(),
        }
    }
}

/// Report summarizing `Booking`s visible to the current `User`.
#[graphql_object(name = "OverviewReport", context = Context)]
impl Overview {
    /// Total number of `Booking`s in the report.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OverviewReport.totalBookingsCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_bookings_count(&self) -> i32 {
        self.output
            .bookings
            .by_status
            .values()
            .copied()
            .map(i32::from)
            .fold(0, i32::saturating_add)
    }

    /// `OverviewReportRow`s of this report, one per `BookingStatus`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OverviewReport.rows",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        self.rows
            .get_or_init(|| {
                booking::StatusKind::ALL
                    .iter()
                    .copied()
                    .map(|status| Row {
                        status: status.into(),
                        count: self.output.bookings.count(status).into(),
                    })
                    .collect()
            })
            .as_slice()
    }

    /// Total price of the completed `Booking`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OverviewReport.completedValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn completed_value(&self) -> Money {
        self.output.bookings.completed_value
    }

    /// Total price of the paid `Booking`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OverviewReport.paidValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn paid_value(&self) -> Money {
        self.output.bookings.paid_value
    }

    /// Number of listed `Equipment`, if the `User` may own any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OverviewReport.equipmentCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn equipment_count(&self) -> Option<i32> {
        self.output.equipment.map(Into::into)
    }
}

/// Row of an [`Overview`] report.
#[derive(Clone, Copy, Debug)]
pub struct Row {
    /// [`api::booking::Status`] this [`Row`] is about.
    status: api::booking::Status,

    /// Number of `Booking`s in the [`api::booking::Status`].
    count: i32,
}

/// Row of an `OverviewReport`.
#[graphql_object(name = "OverviewReportRow", context = Context)]
impl Row {
    /// `BookingStatus` this row is about.
    #[must_use]
    pub fn status(&self) -> api::booking::Status {
        self.status
    }

    /// Number of `Booking`s in the `BookingStatus`.
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }
}
