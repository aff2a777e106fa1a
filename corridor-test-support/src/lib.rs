//! Shared test utilities used across corridor crates.

pub mod fixtures {
    //! Garden layouts with known corridor outcomes.
    use corridor_core::Garden;

    fn garden(id: &str, latitude: f64, longitude: f64, quality: f64, tier: &str) -> Garden {
        Garden::new(id, latitude, longitude, quality, tier).expect("fixture gardens are valid")
    }

    /// Four gardens around 40°N that exercise every analyzer stage with the
    /// generic 0.5 km profile.
    ///
    /// `g1` and `g2` are 0.14 km apart and form the only corridor. `g3` is
    /// 1.26 km from `g2` and 1.40 km from `g1`, inside the gap window, so it
    /// yields one gap zone of priority 2. `g4` is over 100 km away and yields
    /// none.
    ///
    /// # Examples
    /// ```
    /// use corridor_test_support::fixtures::scenario;
    ///
    /// assert_eq!(scenario().len(), 4);
    /// ```
    #[must_use]
    pub fn scenario() -> Vec<Garden> {
        vec![
            garden("g1", 40.0, -111.0, 60.0, "gold"),
            garden("g2", 40.001, -111.001, 40.0, "silver"),
            garden("g3", 40.01, -111.01, 80.0, "gold"),
            garden("g4", 41.0, -112.0, 20.0, "bronze"),
        ]
    }

    /// A row of `count` gardens spaced `spacing_km` apart due north of
    /// 40°N, 111°W.
    #[must_use]
    pub fn meridian_row(count: usize, spacing_km: f64) -> Vec<Garden> {
        (0..count)
            .map(|index| {
                garden(
                    &format!("row-{index}"),
                    40.0 + index as f64 * spacing_km / 111.0,
                    -111.0,
                    50.0,
                    "",
                )
            })
            .collect()
    }
}

pub mod tracing {
    //! Recording layer that captures spans and events for assertions.
    use std::{
        collections::HashMap,
        fmt,
        sync::{Arc, Mutex},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };
    use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

    /// Layer that keeps closed spans and emitted events in memory.
    ///
    /// # Examples
    /// ```
    /// use corridor_test_support::tracing::RecordingLayer;
    ///
    /// let layer = RecordingLayer::default();
    /// assert!(layer.spans().is_empty());
    /// assert!(layer.span("core.analyze").is_none());
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    impl RecordingLayer {
        /// Returns closed spans in completion order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.spans.lock().expect("lock poisoned").clone()
        }

        /// Returns events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.events.lock().expect("lock poisoned").clone()
        }

        /// Returns the first closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.spans().into_iter().find(|span| span.name == name)
        }

        /// Reports whether an event at `level` carried `message`.
        #[must_use]
        pub fn saw_event(&self, level: Level, message: &str) -> bool {
            self.events()
                .iter()
                .any(|event| event.level == level && event.message() == Some(message))
        }
    }

    /// A closed span with its recorded fields.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct SpanRecord {
        /// Span name from the callsite metadata.
        pub name: String,
        /// Field values rendered as strings.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Returns the rendered value of `field`.
        #[must_use]
        pub fn field(&self, field: &str) -> Option<&str> {
            self.fields.get(field).map(String::as_str)
        }
    }

    /// An emitted event with its level and fields.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target.
        pub target: String,
        /// Field values rendered as strings.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Returns the event message, if any.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    struct Pending {
        name: String,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut pending = Pending {
                name: attrs.metadata().name().to_owned(),
                fields: HashMap::new(),
            };
            attrs.record(&mut Fields(&mut pending.fields));
            span.extensions_mut().insert(pending);
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            if let Some(pending) = span.extensions_mut().get_mut::<Pending>() {
                values.record(&mut Fields(&mut pending.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(pending) = span.extensions_mut().remove::<Pending>() else {
                return;
            };
            self.spans.lock().expect("lock poisoned").push(SpanRecord {
                name: pending.name,
                fields: pending.fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut Fields(&mut fields));
            self.events.lock().expect("lock poisoned").push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
        }
    }

    struct Fields<'a>(&'a mut HashMap<String, String>);

    impl Visit for Fields<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }
    }
}
