use crate::api::{RoutePlanner, StationFinder};
use crate::canvas::MemoryCanvas;
use crate::config::DEFAULT_LOCATION;
use crate::geo::{GeoError, LocateOptions, Locator};
use crate::map::{MapWidget, StatusKind};
use crate::structs::*;
use crate::WidgetResult;

use std::cell::RefCell;
use std::collections::VecDeque;

//////////////////////////////////////////////////////////
// Stub collaborators
//////////////////////////////////////////////////////////

struct StubLocator(Result<GeoPoint, GeoError>);

impl Locator for StubLocator {
    async fn current_position(&self, _options: LocateOptions) -> Result<GeoPoint, GeoError> {
        self.0
    }
}

struct StubFinder(Result<Vec<PoliceStation>, String>);

impl StationFinder for StubFinder {
    async fn nearby_stations(
        &self,
        _center: GeoPoint,
        _radius: u32,
    ) -> WidgetResult<Vec<PoliceStation>> {
        match &self.0 {
            Ok(stations) => Ok(stations.clone()),
            Err(message) => Err(message.clone())?,
        }
    }
}

/// Hands out scripted responses in call order.
struct StubPlanner {
    responses: RefCell<VecDeque<Result<Route, String>>>,
}

impl StubPlanner {
    fn new(responses: Vec<Result<Route, String>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
        }
    }
}

impl RoutePlanner for StubPlanner {
    async fn driving_route(&self, start: GeoPoint, end: GeoPoint) -> WidgetResult<Route> {
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(mut route)) => {
                if route.path.is_empty() {
                    route.path = vec![start, end];
                }
                Ok(route)
            }
            Some(Err(message)) => Err(message)?,
            None => Err("sem resposta programada")?,
        }
    }
}

fn station(name: &str, lat: f64, lon: f64) -> PoliceStation {
    PoliceStation {
        name: name.to_string(),
        location: GeoPoint::new(lat, lon),
    }
}

fn route(distance: f64, duration: f64) -> Route {
    Route {
        path: Vec::new(),
        summary: RouteSummary { distance, duration },
    }
}

fn widget(
    finder: StubFinder,
    planner: StubPlanner,
) -> MapWidget<MemoryCanvas, StubFinder, StubPlanner> {
    MapWidget::new(MemoryCanvas::new(), finder, planner)
}

//////////////////////////////////////////////////////////
// Initialization
//////////////////////////////////////////////////////////

#[tokio::test]
async fn successful_fix_recenters_on_the_user() {
    let here = GeoPoint::new(-23.4, -46.5);
    let mut map = widget(StubFinder(Ok(vec![])), StubPlanner::new(vec![]));
    map.init(&StubLocator(Ok(here))).await;

    assert_eq!(map.user_location(), here);
    assert_eq!(map.status().kind, StatusKind::Success);
    assert_eq!(map.canvas().view(), Some((here, 14)));

    let markers = map.canvas().markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].popup, "Sua localização atual");
}

#[tokio::test]
async fn denied_permission_falls_back_to_the_default_location() {
    let mut map = widget(StubFinder(Ok(vec![])), StubPlanner::new(vec![]));
    map.init(&StubLocator(Err(GeoError::PermissionDenied))).await;

    assert_eq!(map.user_location(), DEFAULT_LOCATION);
    assert_eq!(map.status().kind, StatusKind::Error);
    assert!(map.status().text.contains("Permissão"));
    assert!(map.status().text.starts_with("Usando localização padrão:"));

    let markers = map.canvas().markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].popup, "Localização simulada (São Paulo)");
    assert_eq!(map.canvas().view(), Some((DEFAULT_LOCATION, 14)));
}

#[tokio::test]
async fn reinitializing_replaces_the_user_marker() {
    let mut map = widget(StubFinder(Ok(vec![])), StubPlanner::new(vec![]));
    map.init(&StubLocator(Err(GeoError::Timeout))).await;
    map.init(&StubLocator(Ok(GeoPoint::new(-23.4, -46.5)))).await;
    assert_eq!(map.canvas().markers().len(), 1);
}

//////////////////////////////////////////////////////////
// Station search
//////////////////////////////////////////////////////////

#[tokio::test]
async fn search_renders_one_row_per_station() {
    let finder = StubFinder(Ok(vec![
        station("Station A", -23.5, -46.6),
        station("Station B", -23.51, -46.61),
    ]));
    let mut map = widget(finder, StubPlanner::new(vec![]));
    map.search_stations().await;

    assert_eq!(map.rows().len(), 2);
    assert_eq!(map.rows()[0].station.name, "Station A");
    assert_eq!(map.rows()[0].distance_label, "-- km");
    assert_eq!(map.status().kind, StatusKind::Success);
    assert!(map.status().text.starts_with("2 delegacias encontradas."));
    assert!(!map.searching());
}

#[tokio::test]
async fn empty_search_is_informational_not_an_error() {
    let mut map = widget(StubFinder(Ok(vec![])), StubPlanner::new(vec![]));
    map.search_stations().await;

    assert!(map.rows().is_empty());
    assert_eq!(map.status().kind, StatusKind::Info);
    assert_eq!(map.status().text, "Nenhuma delegacia encontrada.");
}

#[tokio::test]
async fn failed_search_surfaces_the_description_and_reenables_the_trigger() {
    let finder = StubFinder(Err("Falha ao buscar delegacias (Overpass API).".to_string()));
    let mut map = widget(finder, StubPlanner::new(vec![]));
    map.search_stations().await;

    assert_eq!(map.status().kind, StatusKind::Error);
    assert!(map.status().text.contains("Falha ao buscar delegacias"));
    assert!(!map.searching());
}

#[tokio::test]
async fn new_search_discards_previous_rows_and_selection() {
    let finder = StubFinder(Ok(vec![station("Station A", -23.5, -46.6)]));
    let planner = StubPlanner::new(vec![Ok(route(1000.0, 60.0))]);
    let mut map = widget(finder, planner);

    map.search_stations().await;
    map.select_station(0).await;
    assert_eq!(map.selected(), Some(0));

    map.search_stations().await;
    assert_eq!(map.selected(), None);
    assert_eq!(map.rows()[0].distance_label, "-- km");
}

//////////////////////////////////////////////////////////
// Route calculation
//////////////////////////////////////////////////////////

#[tokio::test]
async fn selecting_a_station_draws_route_and_reports_summary() {
    let finder = StubFinder(Ok(vec![station("Station A", -23.5, -46.6)]));
    let planner = StubPlanner::new(vec![Ok(route(3500.0, 420.0))]);
    let mut map = widget(finder, planner);

    map.search_stations().await;
    map.select_station(0).await;

    assert_eq!(map.canvas().polylines().len(), 1);
    assert_eq!(map.canvas().markers().len(), 1);
    assert_eq!(map.canvas().markers()[0].popup, "Station A");
    assert_eq!(map.rows()[0].distance_label, "3.50 km");
    assert_eq!(map.status().kind, StatusKind::Success);
    assert!(map.status().text.contains("Station A"));
    assert!(map.status().text.contains("3.50 km"));
    assert!(map.status().text.contains("~7 min"));
}

#[tokio::test]
async fn selecting_a_second_station_replaces_route_and_marker() {
    let finder = StubFinder(Ok(vec![
        station("Station A", -23.5, -46.6),
        station("Station B", -23.51, -46.61),
    ]));
    let planner = StubPlanner::new(vec![
        Ok(route(1200.0, 300.0)),
        Ok(route(3500.0, 420.0)),
    ]);
    let mut map = widget(finder, planner);

    map.search_stations().await;
    map.select_station(0).await;
    map.select_station(1).await;

    // Only B's layers remain.
    assert_eq!(map.canvas().polylines().len(), 1);
    assert_eq!(map.canvas().markers().len(), 1);
    assert_eq!(map.canvas().markers()[0].popup, "Station B");
    assert_eq!(map.selected(), Some(1));
    assert_eq!(map.rows()[1].distance_label, "3.50 km");
    assert!(map.status().text.contains("Station B"));
    assert!(map.status().text.contains("3.50 km"));
    assert!(map.status().text.contains("~7 min"));
}

#[tokio::test]
async fn failed_route_keeps_the_destination_marker() {
    let finder = StubFinder(Ok(vec![station("Station A", -23.5, -46.6)]));
    let planner = StubPlanner::new(vec![Err("Falha ao calcular a rota.".to_string())]);
    let mut map = widget(finder, planner);

    map.search_stations().await;
    map.select_station(0).await;

    assert_eq!(map.status().kind, StatusKind::Error);
    assert!(map.status().text.contains("Falha ao calcular a rota."));
    assert!(map.canvas().polylines().is_empty());
    assert_eq!(map.canvas().markers().len(), 1);
}

#[tokio::test]
async fn reselecting_after_a_failure_recovers() {
    let finder = StubFinder(Ok(vec![station("Station A", -23.5, -46.6)]));
    let planner = StubPlanner::new(vec![
        Err("Falha ao calcular a rota.".to_string()),
        Ok(route(3500.0, 420.0)),
    ]);
    let mut map = widget(finder, planner);

    map.search_stations().await;
    map.select_station(0).await;
    map.select_station(0).await;

    // Last completion wins; exactly one of each layer remains.
    assert_eq!(map.canvas().polylines().len(), 1);
    assert_eq!(map.canvas().markers().len(), 1);
    assert_eq!(map.status().kind, StatusKind::Success);
}

#[tokio::test]
async fn route_color_prefers_the_theme_and_falls_back() {
    let finder = StubFinder(Ok(vec![station("Station A", -23.5, -46.6)]));
    let planner = StubPlanner::new(vec![Ok(route(1000.0, 60.0))]);
    let canvas = MemoryCanvas::with_theme_color(" #123456 ");
    let mut map = MapWidget::new(canvas, finder, planner);
    map.search_stations().await;
    map.select_station(0).await;
    assert_eq!(map.canvas().polylines()[0].color, "#123456");

    let finder = StubFinder(Ok(vec![station("Station A", -23.5, -46.6)]));
    let planner = StubPlanner::new(vec![Ok(route(1000.0, 60.0))]);
    let mut map = widget(finder, planner);
    map.search_stations().await;
    map.select_station(0).await;
    assert_eq!(map.canvas().polylines()[0].color, "#7E2A53");
}

#[tokio::test]
async fn selecting_an_out_of_range_row_is_ignored() {
    let mut map = widget(StubFinder(Ok(vec![])), StubPlanner::new(vec![]));
    map.select_station(3).await;
    assert_eq!(map.selected(), None);
    assert!(map.canvas().markers().is_empty());
}
