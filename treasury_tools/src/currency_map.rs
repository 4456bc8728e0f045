/// Map the provider's free-text currency labels to ISO 4217 codes.
///
/// The rates-of-exchange feed identifies currencies by name ("Euro", "Pound Sterling", ...) rather than by code.
/// The table covers the labels the feed has been observed to use; anything else returns `None` and the caller
/// decides what to do with the raw label. Matching is case-insensitive. Names alone do not identify a currency
/// uniquely ("Rupee", "Dollar" and friends appear under several countries), so disambiguation by country stays
/// the caller's responsibility.
pub fn currency_code_for_label(label: &str) -> Option<&'static str> {
    let code = match label.trim().to_lowercase().as_str() {
        "euro" => "EUR",
        "dollar" => "USD",
        "pound sterling" => "GBP",
        "yen" => "JPY",
        "canadian dollar" => "CAD",
        "australian dollar" => "AUD",
        "swiss franc" => "CHF",
        "swedish krona" => "SEK",
        "norwegian krone" => "NOK",
        "danish krone" => "DKK",
        "hong kong dollar" => "HKD",
        "singapore dollar" => "SGD",
        "new zealand dollar" => "NZD",
        "mexican peso" => "MXN",
        "brazilian real" => "BRL",
        "south african rand" => "ZAR",
        "south korean won" => "KRW",
        "thai baht" => "THB",
        "malaysian ringgit" => "MYR",
        "indonesian rupiah" => "IDR",
        "philippine peso" => "PHP",
        "chinese yuan" | "renminbi" => "CNY",
        "russian ruble" => "RUB",
        "turkish lira" => "TRY",
        "saudi riyal" => "SAR",
        "united arab emirates dirham" => "AED",
        "israeli new sheqel" => "ILS",
        "afghan afghani" => "AFN",
        "argentine peso" => "ARS",
        "bahraini dinar" => "BHD",
        "colombian peso" => "COP",
        "czech koruna" => "CZK",
        "hungarian forint" => "HUF",
        "icelandic króna" => "ISK",
        "kuwaiti dinar" => "KWD",
        "lebanese pound" => "LBP",
        "libyan dinar" => "LYD",
        "moroccan dirham" => "MAD",
        "omani rial" => "OMR",
        "peruvian nuevo sol" => "PEN",
        "qatari riyal" => "QAR",
        "ukrainian hryvnia" => "UAH",
        "bangladeshi taka" => "BDT",
        "bulgarian lev" => "BGN",
        "croatian kuna" => "HRK",
        "estonian kroon" => "EEK",
        "lithuanian litas" => "LTL",
        "pakistani rupee" => "PKR",
        "polish zloty" => "PLN",
        "romanian leu" => "RON",
        "slovak koruna" => "SKK",
        "slovenian tolar" => "SIT",
        "venezuelan bolívar" => "VEB",
        "vietnamese dong" => "VND",
        "zambian kwacha" => "ZMW",
        "kenyan shilling" => "KES",
        "nigerian naira" => "NGN",
        "tunisian dinar" => "TND",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn maps_common_labels_case_insensitively() {
        assert_eq!(currency_code_for_label("Euro"), Some("EUR"));
        assert_eq!(currency_code_for_label("POUND STERLING"), Some("GBP"));
        assert_eq!(currency_code_for_label("  yen "), Some("JPY"));
        assert_eq!(currency_code_for_label("Renminbi"), Some("CNY"));
        assert_eq!(currency_code_for_label("Chinese Yuan"), Some("CNY"));
    }

    #[test]
    fn unknown_labels_are_not_mapped() {
        assert_eq!(currency_code_for_label("Doubloon"), None);
        assert_eq!(currency_code_for_label(""), None);
    }
}
