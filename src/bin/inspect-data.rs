use anyhow::Result;
use burn::backend::ndarray::NdArrayDevice;
use burn::backend::NdArray;
use burn::data::dataloader::DataLoaderBuilder;
use burn::data::dataset::Dataset;
use dotenv::dotenv;
use image::GenericImageView;
use rand::seq::IteratorRandom;

use food_vision::data::folder::ImageFolderDataset;
use food_vision::data::{ImageBatcher, LoaderConfig};
use food_vision::utils::{show_image_terminal_color, Stats};

const PREVIEW_EDGE: u32 = 32;

fn preview_random_samples(dataset: &ImageFolderDataset, n: usize) -> Result<()> {
    let mut rng = rand::thread_rng();
    for index in (0..dataset.len()).choose_multiple(&mut rng, n) {
        let original = dataset.load_image(index)?;
        let item = dataset.try_get(index)?;
        println!(
            "sample {index}: class `{}` - original {:?}, transformed {:?}",
            dataset.classes()[item.label],
            original.dimensions(),
            item.image.dimensions(),
        );
        show_image_terminal_color(&original.thumbnail_exact(PREVIEW_EDGE, PREVIEW_EDGE));
        show_image_terminal_color(&item.image.thumbnail_exact(PREVIEW_EDGE, PREVIEW_EDGE));
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let train = ImageFolderDataset::train()?;
    let test = ImageFolderDataset::test()?;
    let quick_test = ImageFolderDataset::quick_test()?;

    println!("classes: {:?}", train.classes());
    println!("train: {} images", train.len());
    println!("test: {} images", test.len());
    println!("quick test: {} images", quick_test.len());

    preview_random_samples(&train, 3)?;

    // save one decoded sample
    let item = quick_test.try_get(0)?;
    std::fs::create_dir_all("./out")?;
    item.image.save("./out/example-image.png")?;
    println!("label: {} - {}", item.label, quick_test.classes()[item.label]);

    // calculate stats
    let stats = Stats::from_iter(quick_test.iter().map(|item| item.image));
    println!("{:#?}", stats);

    // pull one batch through the loaders
    let config = LoaderConfig::new();
    let device = NdArrayDevice::Cpu;

    let loader_train = DataLoaderBuilder::new(ImageBatcher::<NdArray>::new(device.clone()))
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(config.num_workers)
        .build(train);
    let loader_test = DataLoaderBuilder::new(ImageBatcher::<NdArray>::new(device.clone()))
        .batch_size(config.batch_size)
        .num_workers(config.num_workers)
        .build(test);
    let loader_quick_test = DataLoaderBuilder::new(ImageBatcher::<NdArray>::new(device))
        .batch_size(config.batch_size)
        .num_workers(config.num_workers)
        .build(quick_test);

    for (name, loader) in [
        ("train", &loader_train),
        ("test", &loader_test),
        ("quick test", &loader_quick_test),
    ] {
        if let Some(batch) = loader.iter().next() {
            println!(
                "first {name} batch: images {:?}, labels {:?}",
                batch.images.dims(),
                batch.labels.dims()
            );
        }
    }

    Ok(())
}
