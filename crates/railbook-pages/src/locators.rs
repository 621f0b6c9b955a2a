//! CSS selectors for the booking site, grouped per page.
//!
//! Text-matched elements (station suggestions, fare labels, the one-way
//! radio) carry a container selector here and are matched on visible
//! text at the call site, since selectors alone cannot express text.

/// Home/search page.
pub mod home {
    /// Departure date input, also opens the date picker.
    pub const DATE_INPUT: &str = "input#first-input";
    /// Tab strip inside the date picker.
    pub const ONE_WAY_TAB: &str = "label.lightpick__label";
    /// Container for the one-way radio; matched on text "Viaje solo ida".
    pub const JOURNEY_LABEL: &str = "label";
    /// Visible text of the one-way radio.
    pub const ONE_WAY_TEXT: &str = "Viaje solo ida";
    /// Origin station input.
    pub const ORIGIN_INPUT: &str = "input#origin";
    /// Destination station input.
    pub const DESTINATION_INPUT: &str = "input#destination";
    /// Search submit button.
    pub const SEARCH_BUTTON: &str = "button[type=\"submit\"]";
    /// Cookie consent accept button.
    pub const ACCEPT_COOKIES: &str = "button#onetrust-accept-btn-handler";
    /// Station suggestion entries; matched on the suggestion label.
    pub const STATION_OPTION: &str = "li[role=\"option\"]";
}

/// Search results page.
pub mod results {
    /// One bookable travel option row.
    pub const TRAVEL_OPTION: &str = "div.row.selectedTren";
    /// Spinner shown while result content loads.
    pub const LOADING_INDICATOR: &str = "img.focusTab.seguirTab";
    /// Control that advances the displayed date by one day.
    pub const NEXT_DAY: &str = "button.move_to_tomorrow";
    /// Final price inside a travel option row.
    pub const PRICE: &str = "span.precio-final";
    /// Journey duration inside a travel option row.
    pub const DURATION: &str = "span.col.entre-horas";
    /// Message shown when no outbound tickets exist for the date.
    pub const NO_OFFERS: &str = "p#noDispoIda";
}

/// Fare selection step (rendered on the results page after picking a row).
pub mod fare {
    /// Container for fare tier labels; matched on the tier's site label.
    pub const FARE_LABEL: &str = "span";
    /// Button confirming the fare and moving to passenger details.
    pub const CONFIRM_BUTTON: &str = "button#btnSeleccionar";
    /// Accept button of the fare-upgrade promo modal.
    pub const UPGRADE_ACCEPT: &str = "p#aceptarConfirmacionFareUpgrade";
    /// The fare-upgrade promo modal itself.
    pub const UPGRADE_MODAL: &str = "div.modal-dialog.modal-promoUp";
}

/// Passenger details page.
pub mod passenger {
    /// Page heading.
    pub const TITLE: &str = "h1";
    /// Passenger form, located with deliberately loose selectors.
    pub const FORM: &str = "form, [class*=\"passenger\"], [class*=\"viajero\"]";
}
