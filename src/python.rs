use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{count_from_signed, SimulationConfig};
use crate::constants::{
    DEFAULT_NUM_SIMULATIONS, DEFAULT_QUAL_ZONE_SIZE, DEFAULT_RELEGATION_ZONE_SIZE,
    DEFAULT_SHARPENING_EXPONENT, PIPELINE_NUM_SIMULATIONS,
};
use crate::error::ProjectionError;
use crate::fixture::{parse_percentage, Fixture};
use crate::report::{sort_for_display, ProjectionRow};
use crate::standings::Standings;
use crate::team::TeamStanding;

impl From<ProjectionError> for PyErr {
    fn from(err: ProjectionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Projected final position of one team.
#[pyclass(name = "ProjectionRow", get_all)]
#[derive(Clone, Debug)]
pub struct PyProjectionRow {
    pub team: String,
    pub played: u32,
    pub current_points: u32,
    pub projected_points: u32,
    pub title_pct: f64,
    pub qual_pct: f64,
    pub relegation_pct: f64,
}

impl From<ProjectionRow> for PyProjectionRow {
    fn from(row: ProjectionRow) -> Self {
        PyProjectionRow {
            team: row.team,
            played: row.played,
            current_points: row.current_points,
            projected_points: row.projected_points,
            title_pct: row.title_pct,
            qual_pct: row.qual_pct,
            relegation_pct: row.relegation_pct,
        }
    }
}

#[pymethods]
impl PyProjectionRow {
    fn __repr__(&self) -> String {
        format!(
            "ProjectionRow({:?}, projected={}, title={:.1}%, qual={:.1}%, relegation={:.1}%)",
            self.team, self.projected_points, self.title_pct, self.qual_pct, self.relegation_pct
        )
    }
}

/// Project the final table.
///
/// `standings` is a list of `(team, played, points)`; `fixtures` is a list of
/// `(home, away, home_win, draw, away_win)` fractions. Rows are returned sorted
/// by projected points.
#[pyfunction]
#[pyo3(
    name = "project_standings",
    signature = (
        standings,
        fixtures,
        num_simulations = DEFAULT_NUM_SIMULATIONS as i64,
        sharpening_exponent = DEFAULT_SHARPENING_EXPONENT,
        qual_zone_size = DEFAULT_QUAL_ZONE_SIZE as i64,
        relegation_zone_size = DEFAULT_RELEGATION_ZONE_SIZE as i64,
        seed = None
    )
)]
#[allow(clippy::too_many_arguments)]
fn py_project_standings(
    py: Python<'_>,
    standings: Vec<(String, u32, u32)>,
    fixtures: Vec<(String, String, f64, f64, f64)>,
    num_simulations: i64,
    sharpening_exponent: f64,
    qual_zone_size: i64,
    relegation_zone_size: i64,
    seed: Option<u64>,
) -> PyResult<Vec<PyProjectionRow>> {
    let standings = Standings::from_teams(
        standings
            .into_iter()
            .map(|(name, played, points)| TeamStanding::with_points(name, played, points)),
    )?;
    let fixtures: Vec<Fixture> = fixtures
        .into_iter()
        .map(|(home, away, h, d, a)| Fixture::new(home, away, h, d, a))
        .collect();

    let mut config = SimulationConfig::default()
        .with_num_simulations(count_from_signed("num_simulations", num_simulations)?)
        .with_sharpening_exponent(sharpening_exponent)
        .with_zones(
            count_from_signed("qual_zone_size", qual_zone_size)?,
            count_from_signed("relegation_zone_size", relegation_zone_size)?,
        );
    config.seed = seed;

    let mut rows = py.allow_threads(|| crate::project_standings(&standings, &fixtures, &config))?;
    sort_for_display(&mut rows);
    Ok(rows.into_iter().map(PyProjectionRow::from).collect())
}

/// Parse a percentage string such as `"42.50%"` into a fraction.
#[pyfunction]
#[pyo3(name = "parse_percentage")]
fn py_parse_percentage(text: &str) -> PyResult<f64> {
    parse_percentage(text).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python module definition
#[pymodule]
fn standings_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyProjectionRow>()?;

    m.add_function(wrap_pyfunction!(py_project_standings, m)?)?;
    m.add_function(wrap_pyfunction!(py_parse_percentage, m)?)?;

    m.add("DEFAULT_NUM_SIMULATIONS", DEFAULT_NUM_SIMULATIONS)?;
    m.add("PIPELINE_NUM_SIMULATIONS", PIPELINE_NUM_SIMULATIONS)?;
    m.add("DEFAULT_SHARPENING_EXPONENT", DEFAULT_SHARPENING_EXPONENT)?;

    Ok(())
}
