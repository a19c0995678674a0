//! Human-readable rendering of a [`TourPlan`].

use std::io::{self, Write};

use crate::TourPlan;

/// Line printed when no tour could be produced.
pub const NO_SOLUTION: &str = "No solution found.";

/// Write the tour as a header followed by one stop per line.
///
/// The closing return to the start is printed as the final line.
///
/// # Errors
///
/// Propagates failures from `writer`.
pub fn write_text<W: Write + ?Sized>(writer: &mut W, plan: &TourPlan) -> io::Result<()> {
    writer.write_all(render_text(plan).as_bytes())
}

/// Render the tour into a `String`.
///
/// # Examples
/// ```
/// use roundtrip_core::{Route, Stop, TourPlan};
/// use roundtrip_core::report::render_text;
///
/// let stop = |index: usize, name: &str| Stop { index, name: name.into(), label: None };
/// let plan = TourPlan {
///     start: "a".into(),
///     route: Route::from_cycle(vec![0, 1]),
///     stops: vec![stop(0, "a"), stop(1, "b"), stop(0, "a")],
///     total_distance: 2,
/// };
/// assert_eq!(render_text(&plan), "Shortest route starting in a:\na\nb\na\n");
/// ```
#[must_use]
pub fn render_text(plan: &TourPlan) -> String {
    let mut text = format!("Shortest route starting in {}:\n", plan.start);
    for stop in &plan.stops {
        text.push_str(&stop.to_string());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Route, Stop};
    use rstest::{fixture, rstest};

    #[fixture]
    fn plan() -> TourPlan {
        let stop = |index: usize, name: &str, label: &str| Stop {
            index,
            name: name.to_owned(),
            label: Some(label.to_owned()),
        };
        TourPlan {
            start: "Iowa".to_owned(),
            route: Route::from_cycle(vec![0, 1]),
            stops: vec![
                stop(0, "Iowa", "Des Moines"),
                stop(1, "Illinois", "Springfield"),
                stop(0, "Iowa", "Des Moines"),
            ],
            total_distance: 10,
        }
    }

    #[rstest]
    fn renders_header_and_labelled_stops(plan: TourPlan) {
        assert_eq!(
            render_text(&plan),
            "Shortest route starting in Iowa:\n\
             Iowa - Des Moines\n\
             Illinois - Springfield\n\
             Iowa - Des Moines\n"
        );
    }

    #[rstest]
    fn write_text_targets_any_writer(plan: TourPlan) {
        let mut out: Vec<u8> = Vec::new();
        let writer: &mut dyn Write = &mut out;
        write_text(writer, &plan).expect("vec writer");
        assert!(String::from_utf8(out).expect("utf8").starts_with("Shortest route"));
    }
}
