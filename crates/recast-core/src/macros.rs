/// Build a [`Record`](crate::Record) from `field => value` pairs
///
/// Values go through `Into<Value>`, so literals, strings, nested records and
/// typed wrappers can be mixed freely.
///
/// ```
/// use recast_core::{record, Value};
///
/// let user = record! { "id" => 1, "name" => "Khan" };
/// assert_eq!(user.get("name"), Some(&Value::from("Khan")));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };

    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($field, $crate::Value::from($value));
        )+
        record
    }};
}
