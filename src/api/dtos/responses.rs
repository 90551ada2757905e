use serde::Serialize;

use crate::domain::models::booking::Booking;

#[derive(Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub animal_ids: Vec<String>,
}
