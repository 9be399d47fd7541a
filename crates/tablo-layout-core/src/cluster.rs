//! One-dimensional clustering of layers into rows and columns.

/// Default vertical distance for layers to share a row.
pub const ROW_THRESHOLD: f64 = 20.0;

/// Group items whose key lies within `threshold` of the first member of the current cluster.
///
/// Items are sorted by key first; the result keeps clusters in ascending key order and members in
/// ascending key order within a cluster.
pub fn cluster_sorted<T, F>(mut items: Vec<T>, key: F, threshold: f64) -> Vec<Vec<T>>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut clusters: Vec<Vec<T>> = Vec::new();
    let mut anchor = f64::NAN;
    for item in items {
        let k = key(&item);
        match clusters.last_mut() {
            Some(current) if (k - anchor).abs() <= threshold => current.push(item),
            _ => {
                anchor = k;
                clusters.push(vec![item]);
            }
        }
    }
    clusters
}
