use erp_helpers::core::tax_id::{
    digits_only, individual_check_digits, organization_check_digits, TaxIdIssue, TaxIdKind,
};
use erp_helpers::{validate_individual, validate_organization, TaxId};

/// Known-good identifiers taken from public registry examples.
const VALID_CPFS: [&str; 3] = ["11144477735", "529.982.247-25", "100.000.001-08"];
const VALID_CNPJS: [&str; 2] = ["11222333000181", "11.444.777/0001-61"];

#[test]
fn test_known_vectors() {
    assert!(validate_individual("11144477735"));
    assert!(!validate_individual("11144477736"));
    assert!(validate_organization("11222333000181"));

    for cpf in VALID_CPFS {
        assert!(validate_individual(cpf), "{} should be valid", cpf);
        assert!(!validate_organization(cpf), "{} is not a CNPJ", cpf);
    }
    for cnpj in VALID_CNPJS {
        assert!(validate_organization(cnpj), "{} should be valid", cnpj);
        assert!(!validate_individual(cnpj), "{} is not a CPF", cnpj);
    }
}

#[test]
fn test_any_length_other_than_eleven_fails() {
    let base = "11144477735";
    for len in 0..=20 {
        if len == 11 {
            continue;
        }
        let candidate: String = base.chars().cycle().take(len).collect();
        assert!(!validate_individual(&candidate), "length {} accepted", len);
    }
}

#[test]
fn test_repeated_digits_fail_for_both_kinds() {
    for d in 0..=9 {
        let cpf = d.to_string().repeat(11);
        let cnpj = d.to_string().repeat(14);
        assert!(!validate_individual(&cpf), "{} accepted", cpf);
        assert!(!validate_organization(&cnpj), "{} accepted", cnpj);
    }
}

#[test]
fn test_punctuation_is_ignored() {
    let pairs = [
        ("111.444.777-35", "11144477735"),
        (" 111 444 777 35 ", "11144477735"),
        ("111.444.777-36", "11144477736"),
    ];
    for (punctuated, bare) in pairs {
        assert_eq!(digits_only(punctuated), bare);
        assert_eq!(validate_individual(punctuated), validate_individual(bare));
    }
    assert_eq!(
        validate_organization("11.222.333/0001-81"),
        validate_organization("11222333000181")
    );
}

#[test]
fn test_validation_is_repeatable() {
    for input in ["11144477735", "11144477736", "", "abc", "11222333000181"] {
        let first = (validate_individual(input), validate_organization(input));
        let second = (validate_individual(input), validate_organization(input));
        assert_eq!(first, second);
    }
}

#[test]
fn test_every_single_digit_corruption_is_caught() {
    let digits: Vec<u8> = "11144477735".bytes().map(|b| b - b'0').collect();
    for position in 0..digits.len() {
        for replacement in 0..=9u8 {
            if replacement == digits[position] {
                continue;
            }
            let mut corrupted = digits.clone();
            corrupted[position] = replacement;
            let text: String = corrupted.iter().map(|d| char::from(b'0' + d)).collect();
            assert!(!validate_individual(&text), "{} accepted", text);
        }
    }
}

#[test]
fn test_generated_check_digits_validate() {
    let cpf_base = [3, 9, 0, 5, 3, 3, 4, 4, 7];
    let [d1, d2] = individual_check_digits(&cpf_base);
    let cpf: String = cpf_base
        .iter()
        .chain([d1, d2].iter())
        .map(|d| char::from(b'0' + d))
        .collect();
    assert!(validate_individual(&cpf));

    let cnpj_base = [1, 1, 4, 4, 4, 7, 7, 7, 0, 0, 0, 1];
    assert_eq!(organization_check_digits(&cnpj_base), [6, 1]);
}

#[test]
fn test_parse_reports_issue() {
    assert_eq!(
        TaxId::parse_as(TaxIdKind::Organization, "11.222.333/0001-80"),
        Err(TaxIdIssue::CheckDigitMismatch { position: 13 })
    );
    assert_eq!(
        TaxId::parse_as(TaxIdKind::Individual, "111.444.777"),
        Err(TaxIdIssue::WrongLength {
            expected: 11,
            found: 9
        })
    );
}
