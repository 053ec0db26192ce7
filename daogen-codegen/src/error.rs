use std::{error, fmt};

#[derive(Debug)]
pub enum Error {
    MergeError(String),
    InvalidOption(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MergeError(e) => write!(f, "Failed to merge with existing file: {e}"),
            Self::InvalidOption(e) => write!(f, "Invalid option: {e}"),
        }
    }
}

impl error::Error for Error {}

impl From<syn::Error> for Error {
    fn from(syn_err: syn::Error) -> Self {
        Self::MergeError(syn_err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syn_error_is_merge_error() {
        let syn_err = syn::parse_str::<syn::File>("fn broken( {").unwrap_err();
        let err = Error::from(syn_err);
        assert!(matches!(err, Error::MergeError(_)));
        assert!(
            err.to_string()
                .starts_with("Failed to merge with existing file: ")
        );
    }

    #[test]
    fn test_invalid_option_display() {
        let err = Error::InvalidOption("json".to_owned());
        assert_eq!(err.to_string(), "Invalid option: json");
    }
}
