macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`Particle`](crate::Particle) from feature value names.
///
/// ```
/// use ruleshift::particle;
///
/// let p = particle!["consonant", "voiced"];
/// assert_eq!(p.to_string(), "[consonant,voiced]");
/// ```
#[macro_export]
macro_rules! particle {
    () => {
        $crate::Particle::default()
    };
    ($($name:expr),+ $(,)?) => {
        $crate::Particle::from_names([$($name),*])
    };
}
