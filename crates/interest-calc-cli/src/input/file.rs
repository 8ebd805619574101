use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a form file and deserialise it; `.yaml`/`.yml` are read as YAML,
/// everything else as JSON.
pub fn read_form<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let form_path = resolve_path(path)?;
    let contents = fs::read_to_string(&form_path)
        .map_err(|e| format!("Failed to read '{}': {}", form_path.display(), e))?;

    let is_yaml = form_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let value: T = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", form_path.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", form_path.display(), e))?
    };
    Ok(value)
}

/// Form files are looked up relative to the working directory.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let form_path = std::env::current_dir()?.join(Path::new(path));
    match fs::metadata(&form_path) {
        Ok(meta) if meta.is_file() => Ok(form_path),
        Ok(_) => Err(format!("Form path is not a file: {}", form_path.display()).into()),
        Err(_) => Err(format!("Form file not found: {}", form_path.display()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interest_calc_core::calculator::CalculatorForm;
    use interest_calc_core::PeriodType;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("icalc-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_yaml_form() {
        let path = write_temp(
            "form.yaml",
            "principal: 2500000\nrate_percent: \"8\"\nperiod_type: months\nperiods: 18\n",
        );
        let form: CalculatorForm = read_form(path.to_str().unwrap()).unwrap();
        assert_eq!(form.principal, "2500000");
        assert_eq!(form.rate_percent, "8");
        assert_eq!(form.period_type, PeriodType::Months);
        assert_eq!(form.periods, "18");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_read_json_form_with_defaults() {
        let path = write_temp("form.json", r#"{"principal": "1.500.000"}"#);
        let form: CalculatorForm = read_form(path.to_str().unwrap()).unwrap();
        assert_eq!(form.principal, "1.500.000");
        assert_eq!(form.periods, "3");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_directory_is_not_a_form() {
        let dir = std::env::temp_dir();
        let result: Result<CalculatorForm, _> = read_form(dir.to_str().unwrap());
        assert!(result.unwrap_err().to_string().contains("not a file"));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<CalculatorForm, _> = read_form("/definitely/not/here.json");
        assert!(result.is_err());
    }
}
