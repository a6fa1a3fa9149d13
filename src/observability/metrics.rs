use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub bookings_created_total: IntCounter,
    pub booking_transitions_total: IntCounterVec,
    pub pending_bookings: IntGauge,
    pub time_to_accept_seconds: Histogram,
    pub location_reports_total: IntCounterVec,
    pub change_events_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let bookings_created_total =
            IntCounter::new("bookings_created_total", "Total bookings created")
                .expect("valid bookings_created_total metric");

        let booking_transitions_total = IntCounterVec::new(
            Opts::new(
                "booking_transitions_total",
                "Booking transition attempts by transition and outcome",
            ),
            &["transition", "outcome"],
        )
        .expect("valid booking_transitions_total metric");

        let pending_bookings =
            IntGauge::new("pending_bookings", "Current number of unclaimed bookings")
                .expect("valid pending_bookings metric");

        let time_to_accept_seconds = Histogram::with_opts(HistogramOpts::new(
            "time_to_accept_seconds",
            "Seconds between booking creation and acceptance",
        ))
        .expect("valid time_to_accept_seconds metric");

        let location_reports_total = IntCounterVec::new(
            Opts::new(
                "location_reports_total",
                "Driver position reports by outcome",
            ),
            &["outcome"],
        )
        .expect("valid location_reports_total metric");

        let change_events_total = IntCounterVec::new(
            Opts::new("change_events_total", "Change notifications by table"),
            &["table"],
        )
        .expect("valid change_events_total metric");

        registry
            .register(Box::new(bookings_created_total.clone()))
            .expect("register bookings_created_total");
        registry
            .register(Box::new(booking_transitions_total.clone()))
            .expect("register booking_transitions_total");
        registry
            .register(Box::new(pending_bookings.clone()))
            .expect("register pending_bookings");
        registry
            .register(Box::new(time_to_accept_seconds.clone()))
            .expect("register time_to_accept_seconds");
        registry
            .register(Box::new(location_reports_total.clone()))
            .expect("register location_reports_total");
        registry
            .register(Box::new(change_events_total.clone()))
            .expect("register change_events_total");

        Self {
            registry,
            bookings_created_total,
            booking_transitions_total,
            pending_bookings,
            time_to_accept_seconds,
            location_reports_total,
            change_events_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
