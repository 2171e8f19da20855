use anyhow::{Context, Result};

/// (main category, topic, reference, Arabic, Bangla)
const VERSES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Faith",
        "Mercy",
        "Al-Fatiha:1",
        "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ",
        "পরম করুণাময়, অসীম দয়ালু আল্লাহর নামে।",
    ),
    (
        "Faith",
        "Patience",
        "Al-Baqarah:153",
        "يَا أَيُّهَا الَّذِينَ آمَنُوا اسْتَعِينُوا بِالصَّبْرِ وَالصَّلَاةِ ۚ إِنَّ اللَّهَ مَعَ الصَّابِرِينَ",
        "হে মুমিনগণ! ধৈর্য ও সালাতের মাধ্যমে সাহায্য প্রার্থনা কর। নিশ্চয়ই আল্লাহ ধৈর্যশীলদের সাথে আছেন।",
    ),
    (
        "Faith",
        "Patience",
        "Ash-Sharh:5",
        "فَإِنَّ مَعَ الْعُسْرِ يُسْرًا",
        "নিশ্চয়ই কষ্টের সাথে স্বস্তি আছে।",
    ),
    (
        "Faith",
        "Tawhid",
        "Al-Ikhlas:1",
        "قُلْ هُوَ اللَّهُ أَحَدٌ",
        "বলুন, তিনি আল্লাহ, এক।",
    ),
    (
        "Worship",
        "Prayer",
        "Al-Baqarah:43",
        "وَأَقِيمُوا الصَّلَاةَ وَآتُوا الزَّكَاةَ وَارْكَعُوا مَعَ الرَّاكِعِينَ",
        "আর তোমরা সালাত কায়েম কর, যাকাত দাও এবং রুকুকারীদের সাথে রুকু কর।",
    ),
    (
        "Ethics",
        "Honesty",
        "At-Tawbah:119",
        "يَا أَيُّهَا الَّذِينَ آمَنُوا اتَّقُوا اللَّهَ وَكُونُوا مَعَ الصَّادِقِينَ",
        "হে মুমিনগণ! আল্লাহকে ভয় কর এবং সত্যবাদীদের সাথে থাক।",
    ),
    (
        "Ethics",
        "Brotherhood",
        "Al-Hujurat:10",
        "إِنَّمَا الْمُؤْمِنُونَ إِخْوَةٌ",
        "মুমিনরা তো পরস্পর ভাই ভাই।",
    ),
    (
        "Knowledge",
        "Seeking Knowledge",
        "Ta-Ha:114",
        "وَقُل رَّبِّ زِدْنِي عِلْمًا",
        "এবং বলুন, হে আমার রব! আমার জ্ঞান বৃদ্ধি করে দিন।",
    ),
    (
        "Knowledge",
        "Reading",
        "Al-Alaq:1",
        "اقْرَأْ بِاسْمِ رَبِّكَ الَّذِي خَلَقَ",
        "পড়ুন আপনার রবের নামে, যিনি সৃষ্টি করেছেন।",
    ),
];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_verses.csv".to_string());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "Main Category",
        "Topic",
        "SurahName:AyatNumber",
        "Ayat in Arabic",
        "Bangla Translation",
    ])?;
    for &(category, topic, reference, arabic, bangla) in VERSES {
        writer.write_record([category, topic, reference, arabic, bangla])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} verses to {output_path}", VERSES.len());
    println!("Browse them with:  quran-explorer {output_path}");
    Ok(())
}
