// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Enumerated donor attributes.
//!
//! Blood group, gender, district and employment status are stored as
//! Postgres enum types. Department and academic year are stored as text;
//! their wire form is the institutional code ("101", "2019-2020") and the
//! enums below are the closed sets those codes must resolve into.

use serde::{Deserialize, Serialize};

/// ABO/Rh blood group, serialized in the short lowercase form ("a+", "ab-").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blood_group")]
pub enum BloodGroup {
    #[serde(rename = "a+")]
    #[sqlx(rename = "a+")]
    APositive,
    #[serde(rename = "a-")]
    #[sqlx(rename = "a-")]
    ANegative,
    #[serde(rename = "b+")]
    #[sqlx(rename = "b+")]
    BPositive,
    #[serde(rename = "b-")]
    #[sqlx(rename = "b-")]
    BNegative,
    #[serde(rename = "ab+")]
    #[sqlx(rename = "ab+")]
    AbPositive,
    #[serde(rename = "ab-")]
    #[sqlx(rename = "ab-")]
    AbNegative,
    #[serde(rename = "o+")]
    #[sqlx(rename = "o+")]
    OPositive,
    #[serde(rename = "o-")]
    #[sqlx(rename = "o-")]
    ONegative,
}

/// Donor gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Employment status kept on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "employment_status", rename_all = "lowercase")]
pub enum EmploymentStatus {
    Student,
    Employed,
    Unemployed,
}

/// The 64 districts of Bangladesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "district", rename_all = "lowercase")]
pub enum District {
    Bagerhat,
    Bandarban,
    Barguna,
    Barishal,
    Bhola,
    Bogura,
    Brahmanbaria,
    Chandpur,
    Chapainawabganj,
    Chattogram,
    Chuadanga,
    Cumilla,
    #[serde(rename = "cox's bazar")]
    #[sqlx(rename = "cox's bazar")]
    CoxsBazar,
    Dhaka,
    Dinajpur,
    Faridpur,
    Feni,
    Gaibandha,
    Gazipur,
    Gopalganj,
    Habiganj,
    Jamalpur,
    Jashore,
    Jhalokati,
    Jhenaidah,
    Joypurhat,
    Khagrachhari,
    Khulna,
    Kishoreganj,
    Kurigram,
    Kushtia,
    Lakshmipur,
    Lalmonirhat,
    Madaripur,
    Magura,
    Manikganj,
    Meherpur,
    Moulvibazar,
    Munshiganj,
    Mymensingh,
    Naogaon,
    Narail,
    Narayanganj,
    Narsingdi,
    Natore,
    Netrokona,
    Nilphamari,
    Noakhali,
    Pabna,
    Panchagarh,
    Patuakhali,
    Pirojpur,
    Rajbari,
    Rajshahi,
    Rangamati,
    Rangpur,
    Satkhira,
    Shariatpur,
    Sherpur,
    Sirajganj,
    Sunamganj,
    Sylhet,
    Tangail,
    Thakurgaon,
}

/// Academic departments, keyed by the 3-digit code embedded in student ids.
///
/// The leading digit is the faculty; the remaining two are the department
/// serial within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "101")]
    Bangla,
    #[serde(rename = "102")]
    English,
    #[serde(rename = "103")]
    History,
    #[serde(rename = "104")]
    IslamicHistoryAndCulture,
    #[serde(rename = "105")]
    Philosophy,
    #[serde(rename = "106")]
    FineArts,
    #[serde(rename = "107")]
    Arabic,
    #[serde(rename = "108")]
    IslamicStudies,
    #[serde(rename = "109")]
    Dramatics,
    #[serde(rename = "110")]
    PersianLanguageAndLiterature,
    #[serde(rename = "111")]
    EducationAndResearch,
    #[serde(rename = "112")]
    ModernLanguages,
    #[serde(rename = "113")]
    Sanskrit,
    #[serde(rename = "114")]
    Pali,
    #[serde(rename = "115")]
    Music,
    #[serde(rename = "201")]
    Physics,
    #[serde(rename = "202")]
    Chemistry,
    #[serde(rename = "203")]
    Mathematics,
    #[serde(rename = "204")]
    Statistics,
    #[serde(rename = "205")]
    AppliedChemistryAndChemicalEngineering,
    #[serde(rename = "206")]
    ForestryAndEnvironmentalSciences,
    #[serde(rename = "301")]
    Accounting,
    #[serde(rename = "302")]
    Management,
    #[serde(rename = "303")]
    Finance,
    #[serde(rename = "304")]
    Marketing,
    #[serde(rename = "305")]
    BankingAndInsurance,
    #[serde(rename = "306")]
    HumanResourceManagement,
    #[serde(rename = "401")]
    Economics,
    #[serde(rename = "402")]
    PoliticalScience,
    #[serde(rename = "403")]
    Sociology,
    #[serde(rename = "404")]
    PublicAdministration,
    #[serde(rename = "405")]
    Anthropology,
    #[serde(rename = "406")]
    InternationalRelations,
    #[serde(rename = "407")]
    CommunicationAndJournalism,
    #[serde(rename = "408")]
    DevelopmentStudies,
    #[serde(rename = "409")]
    CriminologyAndPoliceScience,
    #[serde(rename = "501")]
    Law,
    #[serde(rename = "601")]
    Zoology,
    #[serde(rename = "602")]
    Botany,
    #[serde(rename = "603")]
    GeographyAndEnvironmentalStudies,
    #[serde(rename = "604")]
    BiochemistryAndMolecularBiology,
    #[serde(rename = "605")]
    Microbiology,
    #[serde(rename = "606")]
    SoilScience,
    #[serde(rename = "607")]
    GeneticEngineeringAndBiotechnology,
    #[serde(rename = "608")]
    Psychology,
    #[serde(rename = "609")]
    Pharmacy,
    #[serde(rename = "701")]
    ComputerScienceAndEngineering,
    #[serde(rename = "702")]
    ElectricalAndElectronicEngineering,
    #[serde(rename = "801")]
    PhysicalEducationAndSportsScience,
    #[serde(rename = "901")]
    Oceanography,
    #[serde(rename = "902")]
    MarineScience,
    #[serde(rename = "903")]
    Fisheries,
}

impl Department {
    /// Every known department, in code order.
    pub const ALL: [Department; 52] = [
        Department::Bangla,
        Department::English,
        Department::History,
        Department::IslamicHistoryAndCulture,
        Department::Philosophy,
        Department::FineArts,
        Department::Arabic,
        Department::IslamicStudies,
        Department::Dramatics,
        Department::PersianLanguageAndLiterature,
        Department::EducationAndResearch,
        Department::ModernLanguages,
        Department::Sanskrit,
        Department::Pali,
        Department::Music,
        Department::Physics,
        Department::Chemistry,
        Department::Mathematics,
        Department::Statistics,
        Department::AppliedChemistryAndChemicalEngineering,
        Department::ForestryAndEnvironmentalSciences,
        Department::Accounting,
        Department::Management,
        Department::Finance,
        Department::Marketing,
        Department::BankingAndInsurance,
        Department::HumanResourceManagement,
        Department::Economics,
        Department::PoliticalScience,
        Department::Sociology,
        Department::PublicAdministration,
        Department::Anthropology,
        Department::InternationalRelations,
        Department::CommunicationAndJournalism,
        Department::DevelopmentStudies,
        Department::CriminologyAndPoliceScience,
        Department::Law,
        Department::Zoology,
        Department::Botany,
        Department::GeographyAndEnvironmentalStudies,
        Department::BiochemistryAndMolecularBiology,
        Department::Microbiology,
        Department::SoilScience,
        Department::GeneticEngineeringAndBiotechnology,
        Department::Psychology,
        Department::Pharmacy,
        Department::ComputerScienceAndEngineering,
        Department::ElectricalAndElectronicEngineering,
        Department::PhysicalEducationAndSportsScience,
        Department::Oceanography,
        Department::MarineScience,
        Department::Fisheries,
    ];

    /// The 3-digit code as it appears inside student ids.
    pub fn code(&self) -> &'static str {
        match self {
            Department::Bangla => "101",
            Department::English => "102",
            Department::History => "103",
            Department::IslamicHistoryAndCulture => "104",
            Department::Philosophy => "105",
            Department::FineArts => "106",
            Department::Arabic => "107",
            Department::IslamicStudies => "108",
            Department::Dramatics => "109",
            Department::PersianLanguageAndLiterature => "110",
            Department::EducationAndResearch => "111",
            Department::ModernLanguages => "112",
            Department::Sanskrit => "113",
            Department::Pali => "114",
            Department::Music => "115",
            Department::Physics => "201",
            Department::Chemistry => "202",
            Department::Mathematics => "203",
            Department::Statistics => "204",
            Department::AppliedChemistryAndChemicalEngineering => "205",
            Department::ForestryAndEnvironmentalSciences => "206",
            Department::Accounting => "301",
            Department::Management => "302",
            Department::Finance => "303",
            Department::Marketing => "304",
            Department::BankingAndInsurance => "305",
            Department::HumanResourceManagement => "306",
            Department::Economics => "401",
            Department::PoliticalScience => "402",
            Department::Sociology => "403",
            Department::PublicAdministration => "404",
            Department::Anthropology => "405",
            Department::InternationalRelations => "406",
            Department::CommunicationAndJournalism => "407",
            Department::DevelopmentStudies => "408",
            Department::CriminologyAndPoliceScience => "409",
            Department::Law => "501",
            Department::Zoology => "601",
            Department::Botany => "602",
            Department::GeographyAndEnvironmentalStudies => "603",
            Department::BiochemistryAndMolecularBiology => "604",
            Department::Microbiology => "605",
            Department::SoilScience => "606",
            Department::GeneticEngineeringAndBiotechnology => "607",
            Department::Psychology => "608",
            Department::Pharmacy => "609",
            Department::ComputerScienceAndEngineering => "701",
            Department::ElectricalAndElectronicEngineering => "702",
            Department::PhysicalEducationAndSportsScience => "801",
            Department::Oceanography => "901",
            Department::MarineScience => "902",
            Department::Fisheries => "903",
        }
    }

    /// Resolve a 3-digit code to a department, if known.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.code() == code)
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Department {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value).ok_or_else(|| format!("unknown department code: {value}"))
    }
}

/// Academic sessions the institution currently enrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcademicYear {
    #[serde(rename = "2015-2016")]
    Y2015,
    #[serde(rename = "2016-2017")]
    Y2016,
    #[serde(rename = "2017-2018")]
    Y2017,
    #[serde(rename = "2018-2019")]
    Y2018,
    #[serde(rename = "2019-2020")]
    Y2019,
    #[serde(rename = "2020-2021")]
    Y2020,
    #[serde(rename = "2021-2022")]
    Y2021,
    #[serde(rename = "2022-2023")]
    Y2022,
    #[serde(rename = "2023-2024")]
    Y2023,
    #[serde(rename = "2024-2025")]
    Y2024,
    #[serde(rename = "2025-2026")]
    Y2025,
}

impl AcademicYear {
    /// Every supported session, oldest first.
    pub const ALL: [AcademicYear; 11] = [
        AcademicYear::Y2015,
        AcademicYear::Y2016,
        AcademicYear::Y2017,
        AcademicYear::Y2018,
        AcademicYear::Y2019,
        AcademicYear::Y2020,
        AcademicYear::Y2021,
        AcademicYear::Y2022,
        AcademicYear::Y2023,
        AcademicYear::Y2024,
        AcademicYear::Y2025,
    ];

    /// The "YYYY-YYYY" session token.
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicYear::Y2015 => "2015-2016",
            AcademicYear::Y2016 => "2016-2017",
            AcademicYear::Y2017 => "2017-2018",
            AcademicYear::Y2018 => "2018-2019",
            AcademicYear::Y2019 => "2019-2020",
            AcademicYear::Y2020 => "2020-2021",
            AcademicYear::Y2021 => "2021-2022",
            AcademicYear::Y2022 => "2022-2023",
            AcademicYear::Y2023 => "2023-2024",
            AcademicYear::Y2024 => "2024-2025",
            AcademicYear::Y2025 => "2025-2026",
        }
    }

    /// Trailing two digits of the session, which student ids must lead with.
    pub fn session_suffix(&self) -> &'static str {
        &self.as_str()[7..]
    }

    /// Resolve a "YYYY-YYYY" token to a session, if supported.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|y| y.as_str() == token)
    }
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_token(&value).ok_or_else(|| format!("unknown academic year: {value}"))
    }
}
