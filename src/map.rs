use crate::api::{RoutePlanner, StationFinder};
use crate::canvas::{LayerId, MapCanvas};
use crate::config::{DEFAULT_LOCATION, ROUTE_COLOR_FALLBACK, SEARCH_RADIUS};
use crate::geo::{LocateOptions, Locator};
use crate::structs::{GeoPoint, PoliceStation};
use crate::WidgetResult;

//////////////////////////////////////////////////////////
// Status indicator
//////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Loading,
    Success,
    Error,
}

/// Single UI region reporting the current operation's state.
#[derive(Clone, Debug, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

//////////////////////////////////////////////////////////
// Station list rows
//////////////////////////////////////////////////////////

/// One selectable result row: station name plus its distance label, which
/// stays at the placeholder until a route to it is computed.
#[derive(Clone, Debug, PartialEq)]
pub struct StationRow {
    pub station: PoliceStation,
    pub distance_label: String,
}

impl StationRow {
    fn new(station: PoliceStation) -> Self {
        Self {
            station,
            distance_label: "-- km".to_string(),
        }
    }
}

//////////////////////////////////////////////////////////
// Map panel controller
//////////////////////////////////////////////////////////

/// Owns the map state the original kept in module globals: current user
/// location, the three layer handles and the result list. At most one user
/// marker, one destination marker and one route line exist at any time.
pub struct MapWidget<C: MapCanvas, F: StationFinder, R: RoutePlanner> {
    canvas: C,
    finder: F,
    planner: R,
    user_location: GeoPoint,
    user_marker: Option<LayerId>,
    dest_marker: Option<LayerId>,
    route_layer: Option<LayerId>,
    rows: Vec<StationRow>,
    selected: Option<usize>,
    searching: bool,
    status: Status,
}

impl<C: MapCanvas, F: StationFinder, R: RoutePlanner> MapWidget<C, F, R> {
    pub fn new(mut canvas: C, finder: F, planner: R) -> Self {
        canvas.set_view(DEFAULT_LOCATION, 13);
        Self {
            canvas,
            finder,
            planner,
            user_location: DEFAULT_LOCATION,
            user_marker: None,
            dest_marker: None,
            route_layer: None,
            rows: Vec::new(),
            selected: None,
            searching: false,
            status: Status::info(""),
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn rows(&self) -> &[StationRow] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether a search is in flight; frontends disable the trigger and show
    /// the busy label while this is set.
    pub fn searching(&self) -> bool {
        self.searching
    }

    pub fn user_location(&self) -> GeoPoint {
        self.user_location
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Acquires the user's position, falling back to the default location
    /// when the locator fails for any reason.
    pub async fn init<L: Locator>(&mut self, locator: &L) {
        self.status = Status::loading("Obtendo sua localização...");

        match locator.current_position(LocateOptions::default()).await {
            Ok(point) => {
                self.user_location = point;
                self.place_user_marker("Sua localização atual");
                self.canvas.set_view(point, 14);
                self.status = Status::success("Localização obtida com sucesso!");
            }
            Err(err) => {
                log::error!("Erro ao obter localização: {}", err);
                self.user_location = DEFAULT_LOCATION;
                self.place_user_marker("Localização simulada (São Paulo)");
                self.canvas.set_view(self.user_location, 14);
                self.status = Status::error(format!("Usando localização padrão: {}", err));
            }
        }
    }

    fn place_user_marker(&mut self, popup: &str) {
        if let Some(id) = self.user_marker.take() {
            self.canvas.remove_layer(id);
        }
        self.user_marker = Some(self.canvas.add_marker(self.user_location, popup));
    }

    /// Queries the POI service around the current location and rebuilds the
    /// result list. The busy flag backs the frontend's disabled trigger and
    /// is cleared on every exit path; `&mut self` already serializes flows,
    /// so the flag carries no re-entry logic of its own.
    pub async fn search_stations(&mut self) {
        self.searching = true;

        if let Err(err) = self.run_search().await {
            log::error!("Erro ao buscar delegacias: {}", err);
            self.status = Status::error(err.to_string());
        }

        self.searching = false;
    }

    async fn run_search(&mut self) -> WidgetResult<()> {
        self.status = Status::loading("Buscando delegacias próximas...");

        let stations = self
            .finder
            .nearby_stations(self.user_location, SEARCH_RADIUS)
            .await?;

        self.rows.clear();
        self.selected = None;

        if stations.is_empty() {
            self.status = Status::info("Nenhuma delegacia encontrada.");
            return Ok(());
        }

        self.rows = stations.into_iter().map(StationRow::new).collect();
        self.status = Status::success(format!(
            "{} delegacias encontradas. Clique em uma para traçar rota.",
            self.rows.len()
        ));
        Ok(())
    }

    /// Activates one result row: replaces the previous destination marker and
    /// route line, asks the planner for a driving route and reports its
    /// summary. On failure the fresh destination marker stays in place.
    pub async fn select_station(&mut self, index: usize) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let station = row.station.clone();
        self.selected = Some(index);

        if let Err(err) = self.run_route(index, &station).await {
            log::error!("Erro ao traçar rota: {}", err);
            self.status = Status::error(err.to_string());
        }
    }

    async fn run_route(&mut self, index: usize, station: &PoliceStation) -> WidgetResult<()> {
        self.status = Status::loading(format!("Calculando rota para {}...", station.name));

        if let Some(id) = self.route_layer.take() {
            self.canvas.remove_layer(id);
        }
        if let Some(id) = self.dest_marker.take() {
            self.canvas.remove_layer(id);
        }
        self.dest_marker = Some(self.canvas.add_marker(station.location, &station.name));

        let route = self
            .planner
            .driving_route(self.user_location, station.location)
            .await?;

        let color = self
            .canvas
            .primary_color()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| ROUTE_COLOR_FALLBACK.to_string());
        self.route_layer = Some(self.canvas.draw_polyline(&route.path, &color));
        self.canvas.fit_bounds(&route.path, 40);

        let km = route.summary.distance_km();
        let min = route.summary.duration_min();
        if let Some(row) = self.rows.get_mut(index) {
            row.distance_label = format!("{:.2} km", km);
        }
        self.status = Status::success(format!(
            "Rota traçada até {} — {:.2} km, ~{} min",
            station.name, km, min
        ));
        Ok(())
    }
}
