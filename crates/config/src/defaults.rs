pub fn default_fee_rate() -> f64 {
    0.10
}

pub fn default_bid_increment() -> f64 {
    1.0
}

pub fn default_duration_days() -> u32 {
    90
}

pub fn default_min_duration_days() -> u32 {
    1
}

pub fn default_max_duration_days() -> u32 {
    365
}

pub fn default_categories() -> Vec<String> {
    [
        "Tops",
        "Bottoms",
        "Dresses",
        "Outerwear",
        "Shoes",
        "Accessories",
        "NSFW",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

pub fn default_expiry_sweep_interval_seconds() -> u64 {
    60
}

pub fn default_age() -> u32 {
    30
}

pub fn default_age_of_majority() -> u32 {
    18
}

pub fn default_search_history_limit() -> usize {
    5
}

pub fn default_assistant_timeout_seconds() -> u64 {
    10
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}
