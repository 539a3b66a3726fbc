/// Append a `column = ?N` clause and its bound value when an `Option` is `Some`.
///
/// `N` is taken from the parameter count after the push, so clauses and
/// values never drift apart.
///
/// # Usage
///
/// ```ignore
/// let mut sets: Vec<String> = Vec::new();
/// let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
/// push_set!(patch.preferred_occasion, "preferred_occasion", sets, params);
/// ```
#[macro_export]
macro_rules! push_set {
    ($value:expr, $col:literal, $sets:expr, $params:expr) => {
        if let Some(v) = $value {
            $params.push(Box::new(v));
            $sets.push(format!("{} = ?{}", $col, $params.len()));
        }
    };
}
