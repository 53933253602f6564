//! Fixed trip metadata and points of interest, loaded once and never mutated.

use serde::Serialize;

use tripledger_ledger::ExpenseCategory;

/// Budget figures in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripBudget {
    pub total: f64,
    pub airfare: f64,
    pub lodging: f64,
    pub food: f64,
    pub rides: f64,
    /// Airfare, lodging and other costs committed before the trip.
    pub fixed_costs: f64,
    /// What is left for purchases once fixed costs are covered.
    pub available_for_purchases: f64,
}

impl TripBudget {
    /// Per-category cap, where one exists.
    pub fn category_budget(&self, category: ExpenseCategory) -> Option<f64> {
        match category {
            ExpenseCategory::Uber => Some(self.rides),
            ExpenseCategory::Food => Some(self.food),
            ExpenseCategory::Store | ExpenseCategory::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lodging {
    pub address: &'static str,
    pub zone: &'static str,
    pub cost_usd: f64,
    pub check_in: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flight {
    pub departure_time: &'static str,
    pub arrival_time: Option<&'static str>,
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripInfo {
    pub traveler: &'static str,
    pub origin: &'static str,
    pub destination: &'static str,
    pub departure_date: &'static str,
    pub return_date: &'static str,
    pub booking_code: &'static str,
    pub lodging: Lodging,
    pub budget: TripBudget,
    pub outbound: Flight,
    pub inbound: Flight,
}

static TRIP: TripInfo = TripInfo {
    traveler: "Juan Cruz Saint Amant",
    origin: "Buenos Aires, Argentina",
    destination: "Santiago de Chile",
    departure_date: "Viernes 16 de Enero 2026",
    return_date: "Domingo 18 de Enero 2026",
    booking_code: "YXKJBJ",
    lodging: Lodging {
        address: "Argomedo 382, Departamento 502",
        zone: "Santiago Centro",
        cost_usd: 49.0,
        check_in: "19:45",
    },
    budget: TripBudget {
        total: 1500.0,
        airfare: 329.0,
        lodging: 49.0,
        food: 60.0,
        rides: 100.0,
        fixed_costs: 538.0,
        available_for_purchases: 962.0,
    },
    outbound: Flight {
        departure_time: "09:35",
        arrival_time: Some("~12:00"),
        note: None,
    },
    inbound: Flight {
        departure_time: "01:35",
        arrival_time: None,
        note: Some("Estar en aeropuerto ~23:00 del SÁBADO 17"),
    },
};

pub fn trip_info() -> &'static TripInfo {
    &TRIP
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Lodging,
    Mall,
    Store,
    Outlet,
    Airport,
}

/// A point of interest shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: &'static str,
    pub kind: PlaceKind,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
    /// Marker color, `#RRGGBB`.
    pub color: &'static str,
    pub emoji: &'static str,
    pub hours: Option<&'static str>,
    pub distance_km: Option<f64>,
    /// Ride time from the lodging, e.g. `"25-35"`.
    pub ride_minutes: Option<&'static str>,
    pub phone: Option<&'static str>,
}

impl Place {
    /// Turn-by-turn directions link for this place.
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.lat, self.lng
        )
    }

    pub fn is_shopping(&self) -> bool {
        !matches!(self.kind, PlaceKind::Lodging | PlaceKind::Airport)
    }
}

static PLACES: [Place; 7] = [
    Place {
        name: "Departamento",
        kind: PlaceKind::Lodging,
        address: "Argomedo 382, Depto 502, Santiago",
        lat: -33.4489,
        lng: -70.6483,
        color: "#E53935",
        emoji: "🏨",
        hours: None,
        distance_km: None,
        ride_minutes: None,
        phone: None,
    },
    Place {
        name: "Mall Parque Arauco",
        kind: PlaceKind::Mall,
        address: "Av. Presidente Kennedy 5413, Las Condes",
        lat: -33.4012,
        lng: -70.5754,
        color: "#1E88E5",
        emoji: "🛍️",
        hours: Some("L-S 10:00-21:00, D 11:00-21:00"),
        distance_km: Some(12.0),
        ride_minutes: Some("25-35"),
        phone: None,
    },
    Place {
        name: "Tenis & Golf",
        kind: PlaceKind::Store,
        address: "Av. Vitacura 5728, Vitacura",
        lat: -33.398,
        lng: -70.596,
        color: "#4CAF50",
        emoji: "⛳",
        hours: Some("L-S 10:00-20:00"),
        distance_km: Some(10.0),
        ride_minutes: Some("5-10"),
        phone: Some("+56 2 2493 0640"),
    },
    Place {
        name: "Cleto Reyes Chile",
        kind: PlaceKind::Store,
        address: "Las Tranqueras, Las Condes",
        lat: -33.3987716,
        lng: -70.5547705,
        color: "#D32F2F",
        emoji: "🥊",
        hours: Some("L-S 10:00-19:00"),
        distance_km: Some(11.0),
        ride_minutes: Some("5-10"),
        phone: Some("+56 9 7967 1699"),
    },
    Place {
        name: "Easton Outlet Mall",
        kind: PlaceKind::Outlet,
        address: "Av. Frei Montalva 9709, Quilicura",
        lat: -33.3614,
        lng: -70.6847,
        color: "#43A047",
        emoji: "👟",
        hours: Some("L-D 10:00-20:00"),
        distance_km: Some(14.0),
        ride_minutes: Some("25-30"),
        phone: Some("+56 2 2733 5550"),
    },
    Place {
        name: "Arauco Premium Outlet",
        kind: PlaceKind::Outlet,
        address: "Av. San Ignacio 500, Quilicura",
        lat: -33.365,
        lng: -70.689,
        color: "#66BB6A",
        emoji: "🏷️",
        hours: Some("L-S 10:00-20:00, D 11:00-20:00"),
        distance_km: Some(13.0),
        ride_minutes: Some("25-30"),
        phone: None,
    },
    Place {
        name: "Aeropuerto SCL",
        kind: PlaceKind::Airport,
        address: "Aeropuerto Internacional Arturo Merino Benítez",
        lat: -33.393,
        lng: -70.7858,
        color: "#9C27B0",
        emoji: "✈️",
        hours: None,
        distance_km: None,
        ride_minutes: None,
        phone: None,
    },
];

pub fn places() -> &'static [Place] {
    &PLACES
}

/// Places worth a shopping stop (everything but lodging and the airport).
pub fn shopping_places() -> impl Iterator<Item = &'static Place> {
    PLACES.iter().filter(|p| p.is_shopping())
}
